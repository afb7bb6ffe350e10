//! Dump the decoded contents of an HDS Bootstrap Info (abst) file.
//!
//! Run: `abst_dump <bootstrap_file>`
//!
//! Prints one field per line to stdout; any read or decode error goes
//! to stderr and the process exits non-zero without producing a dump.

use std::{env, fs, process};

use hds_bootstrap::decode_abst;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() != 2 {
        eprintln!("Usage: {} <bootstrap_file>", args[0]);
        process::exit(1);
    }

    let filename = &args[1];
    let data = match fs::read(filename) {
        Ok(data) => data,
        Err(err) => {
            eprintln!("failed to read {}: {}", filename, err);
            process::exit(1);
        }
    };

    match decode_abst(&data) {
        Ok(abst) => print!("{}", abst),
        Err(err) => {
            eprintln!("failed to decode {}: {}", filename, err);
            process::exit(1);
        }
    }
}
