use nfcreplay::constants::ACK_FRAME;
use nfcreplay::driver::Pn532;
use nfcreplay::test_support::{device_frame, handshake_bytes};
use nfcreplay::transport::MockTransport;
use nfcreplay::{ExpectedApdu, Reader};

fn seeded_mock() -> MockTransport {
    let mut mock = MockTransport::new();
    mock.queue_bytes(&handshake_bytes());
    mock
}

fn queue_type_a_detection(mock: &mut MockTransport) {
    mock.queue_bytes(&ACK_FRAME);
    // One target: tg 1, SENS_RES 0x0400, SEL_RES 0x20 (ISO-DEP), 4-byte
    // NFCID, 3-byte ATS
    mock.queue_bytes(&device_frame(&[
        0x4B, 0x01, 0x01, 0x04, 0x00, 0x20, 0x04, 0x08, 0x01, 0x02, 0x03, 0x03, 0x78, 0x80, 0x70,
    ]));
}

fn queue_exchange(mock: &mut MockTransport, payload: &[u8]) {
    let mut rsp = vec![0x41, 0x00];
    rsp.extend_from_slice(payload);
    mock.queue_bytes(&ACK_FRAME);
    mock.queue_bytes(&device_frame(&rsp));
}

#[test]
fn poll_then_transact_with_matching_responses() {
    let mut mock = seeded_mock();
    queue_type_a_detection(&mut mock);
    queue_exchange(&mut mock, &[0x90, 0x00]);
    queue_exchange(&mut mock, &[0x6A, 0x82]);

    let mut device = Pn532::open(mock).unwrap();
    let tag = device.poll_a().unwrap().expect("target present");
    assert_eq!(tag.nfcid, vec![0x08, 0x01, 0x02, 0x03]);
    assert_eq!(tag.ats, vec![0x78, 0x80, 0x70]);

    let ok = device
        .transact(
            &[vec![0x00, 0xA4, 0x04, 0x00], vec![0x80, 0xCA]],
            &[
                ExpectedApdu::Data(vec![0x90, 0x00]),
                ExpectedApdu::Data(vec![0x6A, 0x82]),
            ],
        )
        .unwrap();
    assert!(ok);
}

#[test]
fn wildcard_expectation_accepts_any_response() {
    let mut mock = seeded_mock();
    queue_type_a_detection(&mut mock);
    queue_exchange(&mut mock, &[0xDE, 0xAD]);

    let mut device = Pn532::open(mock).unwrap();
    device.poll_a().unwrap().expect("target present");
    let ok = device
        .transact(&[vec![0x00, 0xB0]], &[ExpectedApdu::Any])
        .unwrap();
    assert!(ok);
}

#[test]
fn leading_zero_byte_in_actual_response_is_tolerated() {
    let mut mock = seeded_mock();
    queue_type_a_detection(&mut mock);
    // Actual response carries an extra leading zero ahead of the expected
    // bytes
    queue_exchange(&mut mock, &[0x00, 0x90, 0x00]);

    let mut device = Pn532::open(mock).unwrap();
    device.poll_a().unwrap().expect("target present");
    let ok = device
        .transact(
            &[vec![0x00, 0xA4]],
            &[ExpectedApdu::Data(vec![0x90, 0x00])],
        )
        .unwrap();
    assert!(ok);
}

#[test]
fn mismatch_reports_failure_not_error() {
    let mut mock = seeded_mock();
    queue_type_a_detection(&mut mock);
    queue_exchange(&mut mock, &[0x6F, 0x00]);

    let mut device = Pn532::open(mock).unwrap();
    device.poll_a().unwrap().expect("target present");
    let ok = device
        .transact(
            &[vec![0x00, 0xA4]],
            &[ExpectedApdu::Data(vec![0x90, 0x00])],
        )
        .unwrap();
    assert!(!ok);
}

#[test]
fn all_blank_expectations_succeed_without_exchanges() {
    let mut mock = seeded_mock();
    queue_type_a_detection(&mut mock);
    // No exchange responses queued at all

    let mut device = Pn532::open(mock).unwrap();
    device.poll_a().unwrap().expect("target present");
    let ok = device
        .transact(
            &[vec![0x00, 0xA4], vec![0x80, 0xCA]],
            &[ExpectedApdu::Data(vec![]), ExpectedApdu::Data(vec![])],
        )
        .unwrap();
    assert!(ok);
}

#[test]
fn empty_field_yields_no_target() {
    let mut mock = seeded_mock();
    mock.queue_bytes(&ACK_FRAME);
    mock.queue_bytes(&device_frame(&[0x4B, 0x00]));

    let mut device = Pn532::open(mock).unwrap();
    assert!(device.poll_a().unwrap().is_none());
}
