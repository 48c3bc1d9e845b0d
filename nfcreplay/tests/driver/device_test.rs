use nfcreplay::constants::ACK_FRAME;
use nfcreplay::driver::frame::Frame;
use nfcreplay::driver::Pn532;
use nfcreplay::test_support::{device_frame, handshake_bytes};
use nfcreplay::transport::MockTransport;
use nfcreplay::{Reader, CONFIGURATION_B_LONG};

#[test]
fn handshake_sends_expected_wire_traffic() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut mock = MockTransport::new();
    mock.queue_bytes(&handshake_bytes());
    let device = Pn532::open(mock).unwrap();
    let mock = device.into_transport();

    // Wake ACK, then command/ACK pairs for firmware, SAM and retry config
    assert_eq!(mock.sent.len(), 7);
    // Commands before the connection is verified carry the long preamble
    assert_eq!(mock.sent[1], Frame::encode(&[0x02], true).unwrap());
    assert_eq!(
        mock.sent[3],
        Frame::encode(&[0x14, 0x01, 0x00], true).unwrap()
    );
    // The retry configuration is sent after the preamble is dropped
    assert_eq!(
        mock.sent[5],
        Frame::encode(&[0x32, 0x05, 0x00, 0x00, 0x00], false).unwrap()
    );
    assert_eq!(mock.sent[6], ACK_FRAME.to_vec());
    assert_eq!(mock.pending(), 0);
}

#[test]
fn firmware_version_bytes_are_returned() {
    let mut mock = MockTransport::new();
    mock.queue_bytes(&handshake_bytes());
    mock.queue_bytes(&ACK_FRAME);
    mock.queue_bytes(&device_frame(&[0x03, 0x32, 0x01, 0x06, 0x07]));
    let mut device = Pn532::open(mock).unwrap();
    assert_eq!(
        device.get_firmware_version().unwrap(),
        vec![0x32, 0x01, 0x06, 0x07]
    );
}

#[test]
fn repeated_broadcasts_reuse_the_cached_configuration() {
    let mut mock = MockTransport::new();
    mock.queue_bytes(&handshake_bytes());
    // First broadcast: timing config, register read, register write,
    // communicate-thru
    mock.queue_bytes(&ACK_FRAME);
    mock.queue_bytes(&device_frame(&[0x33]));
    mock.queue_bytes(&ACK_FRAME);
    mock.queue_bytes(&device_frame(&[0x07, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]));
    mock.queue_bytes(&ACK_FRAME);
    mock.queue_bytes(&device_frame(&[0x09]));
    mock.queue_bytes(&ACK_FRAME);
    mock.queue_bytes(&device_frame(&[0x43, 0x01]));
    // Second broadcast: everything but the communicate-thru is cached
    mock.queue_bytes(&ACK_FRAME);
    mock.queue_bytes(&device_frame(&[0x43, 0x01]));

    let mut device = Pn532::open(mock).unwrap();
    let data = [0x05, 0x00, 0x00];
    assert!(device
        .send_broadcast(&data, &CONFIGURATION_B_LONG)
        .unwrap()
        .is_none());
    assert!(device
        .send_broadcast(&data, &CONFIGURATION_B_LONG)
        .unwrap()
        .is_none());

    let mock = device.into_transport();
    // 7 handshake sends, 8 for the first broadcast, 2 for the second
    assert_eq!(mock.sent.len(), 17);
    assert_eq!(mock.pending(), 0);
}

#[test]
fn broadcast_answer_is_surfaced() {
    let mut mock = MockTransport::new();
    mock.queue_bytes(&handshake_bytes());
    mock.queue_bytes(&ACK_FRAME);
    mock.queue_bytes(&device_frame(&[0x33]));
    mock.queue_bytes(&ACK_FRAME);
    mock.queue_bytes(&device_frame(&[0x07, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]));
    mock.queue_bytes(&ACK_FRAME);
    mock.queue_bytes(&device_frame(&[0x09]));
    mock.queue_bytes(&ACK_FRAME);
    mock.queue_bytes(&device_frame(&[0x43, 0x00, 0x50, 0x01, 0x02]));

    let mut device = Pn532::open(mock).unwrap();
    let rsp = device
        .send_broadcast(&[0x05, 0x00, 0x00], &CONFIGURATION_B_LONG)
        .unwrap();
    assert_eq!(rsp, Some(vec![0x50, 0x01, 0x02]));
}
