#![no_main]

use hds_bootstrap::{AbstBox, AfrtBox, AsrtBox};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Decoding arbitrary bytes must only ever return errors, never panic
    // or read out of bounds.
    if let Ok((abst, consumed)) = AbstBox::decode(data) {
        assert!(consumed <= data.len());

        // Rendering a successfully decoded box must not panic either.
        let _ = abst.to_string();
    }

    let _ = AsrtBox::decode(data);
    let _ = AfrtBox::decode(data);
});
