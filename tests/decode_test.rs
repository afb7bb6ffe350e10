// Integration tests driving the decoders through the test_utils builders

use hds_bootstrap::{
    decode_abst,
    test_utils::{AbstBuilder, AfrtBuilder, AsrtBuilder},
    AbstBox, Error, Profile,
};

fn sample_abst() -> Vec<u8> {
    AbstBuilder::new()
        .bootstrap_info_version(14)
        .packed_byte(0b0010_0000) // Named Access, live, full version
        .time_scale(1000)
        .current_media_time(86_400_000)
        .movie_identifier("events/concert.f4m")
        .server("http://cdn-a.example.com/hds")
        .server("http://cdn-b.example.com/hds")
        .quality("720p")
        .metadata("onMetaData")
        .segment_run_table(AsrtBuilder::new().entry(1, 20).entry(43, 4))
        .segment_run_table(AsrtBuilder::new().quality("720p").entry(1, 10))
        .fragment_run_table(
            AfrtBuilder::new()
                .time_scale(1000)
                .entry(1, 0, 4000, None)
                .entry(847, 3_384_000, 0, Some(0)),
        )
        .build()
}

#[test]
fn decodes_nested_tables_field_for_field() {
    let buf = sample_abst();
    let (abst, consumed) = AbstBox::decode(&buf).unwrap();

    assert_eq!(consumed, buf.len());
    assert_eq!(abst.header.size(), buf.len() as u64);
    assert_eq!(abst.bootstrap_info_version, 14);
    assert_eq!(abst.profile, Profile::NamedAccess);
    assert!(abst.live);
    assert!(!abst.update);
    assert_eq!(abst.time_scale, 1000);
    assert_eq!(abst.current_media_time, 86_400_000);
    assert_eq!(abst.smpte_time_code_offset, 0);
    assert_eq!(abst.movie_identifier, "events/concert.f4m");
    assert_eq!(
        abst.server_base_urls,
        vec![
            "http://cdn-a.example.com/hds",
            "http://cdn-b.example.com/hds"
        ]
    );
    assert_eq!(abst.quality_segment_url_modifiers, vec!["720p"]);
    assert_eq!(abst.drm_data, "");
    assert_eq!(abst.metadata, "onMetaData");

    assert_eq!(abst.segment_run_tables.len(), 2);
    let first = &abst.segment_run_tables[0];
    assert_eq!(first.segment_run_entries.len(), 2);
    assert_eq!(first.segment_run_entries[0].first_segment, 1);
    assert_eq!(first.segment_run_entries[0].fragments_per_segment, 20);
    assert_eq!(first.segment_run_entries[1].first_segment, 43);
    assert_eq!(first.segment_run_entries[1].fragments_per_segment, 4);
    let second = &abst.segment_run_tables[1];
    assert_eq!(second.quality_segment_url_modifiers, vec!["720p"]);
    assert_eq!(second.segment_run_entries.len(), 1);

    assert_eq!(abst.fragment_run_tables.len(), 1);
    let afrt = &abst.fragment_run_tables[0];
    assert_eq!(afrt.time_scale, 1000);
    assert_eq!(afrt.fragment_run_entries.len(), 2);
    assert_eq!(afrt.fragment_run_entries[0].first_fragment, 1);
    assert_eq!(afrt.fragment_run_entries[0].fragment_duration, 4000);
    assert_eq!(afrt.fragment_run_entries[0].discontinuity_indicator, None);
    assert_eq!(afrt.fragment_run_entries[1].first_fragment, 847);
    assert_eq!(
        afrt.fragment_run_entries[1].first_fragment_timestamp,
        3_384_000
    );
    assert_eq!(
        afrt.fragment_run_entries[1].discontinuity_indicator,
        Some(0)
    );
}

#[test]
fn decoding_twice_yields_equal_results() {
    let buf = sample_abst();
    let first = decode_abst(&buf).unwrap();
    let second = decode_abst(&buf).unwrap();
    assert_eq!(first, second);
}

#[test]
fn nested_box_with_extended_size_header() {
    let buf = AbstBuilder::new()
        .segment_run_table(AsrtBuilder::new().extended_header().entry(1, 20))
        .fragment_run_table(
            AfrtBuilder::new()
                .extended_header()
                .time_scale(1000)
                .entry(1, 0, 4000, None),
        )
        .build();

    let (abst, consumed) = AbstBox::decode(&buf).unwrap();
    assert_eq!(consumed, buf.len());

    let asrt = &abst.segment_run_tables[0];
    assert_eq!(asrt.header.total_size, 1);
    assert!(asrt.header.extended_size.is_some());
    assert_eq!(asrt.segment_run_entries.len(), 1);

    let afrt = &abst.fragment_run_tables[0];
    assert!(afrt.header.extended_size.is_some());
    assert_eq!(afrt.fragment_run_entries.len(), 1);
}

#[test]
fn any_prefix_of_a_valid_abst_fails_cleanly() {
    let buf = sample_abst();
    for len in 0..buf.len() {
        match decode_abst(&buf[..len]) {
            Err(Error::TruncatedInput { .. }) => {}
            Err(Error::NestedBoxDecodeFailed { source, .. }) => {
                assert!(
                    matches!(*source, Error::TruncatedInput { .. }),
                    "prefix of {} bytes: nested failure was not truncation",
                    len
                );
            }
            other => panic!(
                "prefix of {} bytes: expected a truncation error, got {:?}",
                len, other
            ),
        }
    }
}

#[test]
fn hostile_entry_counts_fail_without_allocating() {
    // Empty tables end in their 4-byte entry count; rewrite it to claim
    // u32::MAX entries with no bytes behind it. Decoding must report
    // truncation, not attempt a count-sized allocation.
    let mut asrt = AsrtBuilder::new().build();
    let at = asrt.len() - 4;
    asrt[at..].copy_from_slice(&u32::MAX.to_be_bytes());

    let mut afrt = AfrtBuilder::new().time_scale(1000).build();
    let at = afrt.len() - 4;
    afrt[at..].copy_from_slice(&u32::MAX.to_be_bytes());

    let buf = AbstBuilder::new()
        .raw_segment_run_table(asrt)
        .raw_fragment_run_table(afrt)
        .build();

    match decode_abst(&buf) {
        Err(Error::NestedBoxDecodeFailed { index, source, .. }) => {
            assert_eq!(index, 0);
            assert!(matches!(*source, Error::TruncatedInput { .. }));
        }
        other => panic!("expected NestedBoxDecodeFailed, got {:?}", other),
    }
}

#[test]
fn dump_covers_nested_tables() {
    let abst = decode_abst(&sample_abst()).unwrap();
    let dump = abst.to_string();

    assert!(dump.contains("BoxType: abst"));
    assert!(dump.contains("MovieIdentifier: events/concert.f4m"));
    assert!(dump.contains("SegmentRunTableCount: 2"));
    assert!(dump.contains("SegmentRunTableEntries[1]:"));
    assert!(dump.contains("SegmentRunEntryTable[1].FirstSegment: 43"));
    assert!(dump.contains("FragmentRunTableCount: 1"));
    assert!(dump.contains("FragmentRunEntryTable[1].DiscontinuityIndicator: 0"));
    // one field per line, nothing glued together
    assert!(dump.lines().all(|l| l.is_empty() || l.contains(": ") || l.ends_with(':') || l.starts_with("---")));
}

#[test]
fn update_bootstrap_with_update_tables() {
    let buf = AbstBuilder::new()
        .packed_byte(0b0001_0000) // update
        .bootstrap_info_version(14)
        .segment_run_table(AsrtBuilder::new().flags(1).entry(361, 4))
        .fragment_run_table(AfrtBuilder::new().flags(1).time_scale(1000).entry(
            1441,
            5_760_000,
            4000,
            None,
        ))
        .build();

    let abst = decode_abst(&buf).unwrap();
    assert!(abst.update);
    assert!(abst.segment_run_tables[0].is_update());
    assert!(abst.fragment_run_tables[0].is_update());
}

#[test]
fn trailing_garbage_is_not_consumed() {
    let mut buf = sample_abst();
    let expected = buf.len();
    buf.extend_from_slice(b"garbage after the box");

    let (_, consumed) = AbstBox::decode(&buf).unwrap();
    assert_eq!(consumed, expected);
}
