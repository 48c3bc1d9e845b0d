#[path = "../common/mod.rs"]
mod common;

use common::fixtures;
use nfcreplay::standardize::{filter_timeframe, replace_aids, standardize_capture};
use nfcreplay::{NfcType, TraceEntry};

/// Capture of two transactions against different applications, preceded by
/// a polling loop burst.
fn two_transaction_capture() -> String {
    let polling = fixtures::polling_record(&[
        fixtures::polling_sub(0, &[]),
        fixtures::polling_sub(1, &[0x26]),
    ]);
    let first = fixtures::apdu_record(&[
        fixtures::command_sub(true, &fixtures::aid_select(0xAA)),
        fixtures::response_sub(true, &[0x90, 0x00]),
        fixtures::command_sub(false, &[0x80, 0xCA, 0x9F, 0x7F, 0x00]),
        fixtures::response_sub(false, &[0x6A, 0x82]),
    ]);
    let second = fixtures::apdu_record(&[
        fixtures::command_sub(true, &fixtures::aid_select(0xBB)),
        fixtures::response_sub(true, &[0x90, 0x00]),
    ]);
    let body = fixtures::capture_body(10_000, &[(100, polling), (200, first), (300, second)]);
    fixtures::envelope(&body)
}

#[test]
fn capture_standardizes_into_groups() {
    let entries = standardize_capture(&two_transaction_capture()).unwrap();
    // Field-on entry dropped, Type A entry kept, two APDU groups
    assert_eq!(entries.len(), 3);
    match &entries[0] {
        TraceEntry::PollingLoop(e) => {
            assert_eq!(e.nfc_type, NfcType::A);
            assert_eq!(e.data, vec![0x26]);
        }
        other => panic!("unexpected entry {:?}", other),
    }
    match &entries[1] {
        TraceEntry::FullApdu(full) => {
            assert_eq!(full.commands.len(), 2);
            assert_eq!(full.responses, vec![vec![0x90, 0x00], vec![0x6A, 0x82]]);
        }
        other => panic!("unexpected entry {:?}", other),
    }
    match &entries[2] {
        TraceEntry::FullApdu(full) => {
            assert_eq!(full.commands.len(), 1);
            assert_eq!(full.timestamp_us, 10_000);
        }
        other => panic!("unexpected entry {:?}", other),
    }
}

#[test]
fn aid_substitution_spans_groups() {
    let entries = replace_aids(standardize_capture(&two_transaction_capture()).unwrap());
    let mut selects = Vec::new();
    for entry in &entries {
        if let TraceEntry::FullApdu(full) = entry {
            for cmd in &full.commands {
                if cmd.starts_with(&[0x00, 0xA4, 0x04, 0x00]) {
                    selects.push(cmd.clone());
                }
            }
        }
    }
    assert_eq!(selects.len(), 2);
    assert_ne!(selects[0], selects[1]);
    // Both rewritten to the fixed test application AIDs
    assert_eq!(selects[0][5..8], [0xA0, 0x00, 0x00]);
    assert_eq!(selects[1][5..8], [0xA0, 0x00, 0x00]);
}

#[test]
fn timeframe_filter_cuts_early_entries() {
    let entries = standardize_capture(&two_transaction_capture()).unwrap();
    let filtered = filter_timeframe(entries, Some(9_600), None);
    // The polling entry at 9_500 is gone; both APDU groups remain
    assert_eq!(filtered.len(), 2);
    assert!(filtered
        .iter()
        .all(|e| matches!(e, TraceEntry::FullApdu(_))));
}
