#[path = "../common/mod.rs"]
mod common;

use common::fixtures;
use nfcreplay::snoop::{calculate_start_timestamp, parse_capture};
use nfcreplay::{NfcType, SnoopEntry};

#[test]
fn timestamps_anchor_to_the_last_record() -> anyhow::Result<()> {
    let polling = fixtures::polling_record(&[fixtures::polling_sub(1, &[0x26])]);
    let body = fixtures::capture_body(
        1_000_000,
        &[
            (10, polling.clone()),
            (20, polling.clone()),
            (30, polling),
        ],
    );
    assert_eq!(calculate_start_timestamp(&body)?, 999_940);

    let entries = parse_capture(&fixtures::envelope(&body))?;
    assert_eq!(entries.len(), 3);
    let stamps: Vec<u64> = entries.iter().map(SnoopEntry::timestamp_us).collect();
    // Deltas 10/20/30 accumulate forward; the final record lands exactly on
    // the anchor
    assert_eq!(stamps, vec![999_950, 999_970, 1_000_000]);
    Ok(())
}

#[test]
fn mixed_records_decode_in_order() {
    let polling = fixtures::polling_record(&[
        fixtures::polling_sub(0, &[]),
        fixtures::polling_sub(1, &[0x26]),
        fixtures::polling_sub(2, &[0x05, 0x00, 0x00]),
    ]);
    let apdu = fixtures::apdu_record(&[
        fixtures::command_sub(true, &fixtures::aid_select(0x01)),
        fixtures::response_sub(true, &[0x90, 0x00]),
    ]);
    // A status record (type bits 0b010) sharing the walk but never decoded
    let other = vec![0x4F, 0x0C, 0x00, 0x00, 0x01, 0x02];
    let body = fixtures::capture_body(5_000, &[(100, polling), (50, other), (25, apdu)]);

    let entries = parse_capture(&fixtures::envelope(&body)).unwrap();
    assert_eq!(entries.len(), 5);
    match &entries[0] {
        SnoopEntry::PollingLoop(e) => {
            assert_eq!(e.nfc_type, NfcType::RemoteField);
            assert_eq!(e.timestamp_us, 4_925);
        }
        other => panic!("unexpected entry {:?}", other),
    }
    match &entries[1] {
        SnoopEntry::PollingLoop(e) => {
            assert_eq!(e.nfc_type, NfcType::A);
            assert_eq!(e.data, vec![0x26]);
        }
        other => panic!("unexpected entry {:?}", other),
    }
    match &entries[2] {
        SnoopEntry::PollingLoop(e) => assert_eq!(e.nfc_type, NfcType::B),
        other => panic!("unexpected entry {:?}", other),
    }
    match &entries[3] {
        SnoopEntry::PartialApdu(e) => {
            assert!(e.is_command());
            assert_eq!(e.data, fixtures::aid_select(0x01));
            assert_eq!(e.timestamp_us, 5_000);
        }
        other => panic!("unexpected entry {:?}", other),
    }
    match &entries[4] {
        SnoopEntry::PartialApdu(e) => {
            assert!(!e.is_command());
            assert_eq!(e.data, vec![0x90, 0x00]);
        }
        other => panic!("unexpected entry {:?}", other),
    }
}

#[test]
fn envelope_without_end_marker_still_decodes() {
    let body = fixtures::capture_body(42, &[]);
    let text = fixtures::envelope(&body);
    let truncated: String = text
        .lines()
        .take_while(|l| !l.contains("END:NFCSNOOP_"))
        .map(|l| format!("{}\n", l))
        .collect();
    let entries = parse_capture(&truncated).unwrap();
    assert!(entries.is_empty());
}

#[test]
fn truncated_record_aborts_the_whole_parse() {
    let polling = fixtures::polling_record(&[fixtures::polling_sub(1, &[0x26])]);
    let mut body = fixtures::capture_body(1_000, &[(10, polling)]);
    // Declare a payload extending past the end of the stream
    body.extend_from_slice(&0x80u16.to_le_bytes());
    body.extend_from_slice(&5u32.to_le_bytes());
    body.push(0x00);
    body.extend_from_slice(&[0x6F, 0x0C]);
    assert!(parse_capture(&fixtures::envelope(&body)).is_err());
}
