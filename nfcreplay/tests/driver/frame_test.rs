use nfcreplay::constants::{ACK_FRAME, TFI_DEVICE_TO_HOST, WIRE_SOF};
use nfcreplay::driver::frame::{dcs, lcs, Frame};
use nfcreplay::test_support::device_frame;

#[test]
fn host_frame_layout_matches_the_wire_format() {
    // GetFirmwareVersion, the canonical smallest command
    let frame = Frame::encode(&[0x02], false).unwrap();
    assert_eq!(frame, hex::decode("0000ff02fed4022a00").unwrap());
}

#[test]
fn long_preamble_prepends_twenty_zero_bytes() {
    let short = Frame::encode(&[0x02], false).unwrap();
    let long = Frame::encode(&[0x02], true).unwrap();
    assert_eq!(long.len(), short.len() + 20);
    assert!(long[..20].iter().all(|&b| b == 0x00));
    assert_eq!(&long[20..], &short[..]);
}

#[test]
fn device_frame_fixture_carries_valid_checksums() {
    let frame = device_frame(&[0x03, 0x32, 0x01, 0x06, 0x07]);
    assert_eq!(frame[..3], WIRE_SOF);
    let len = frame[3];
    assert_eq!(frame[4], lcs(len));
    assert_eq!(frame[5], TFI_DEVICE_TO_HOST);
    let body_end = 5 + len as usize;
    assert_eq!(frame[body_end], dcs(&frame[5..body_end]));
    assert_eq!(frame[body_end + 1], 0x00);
}

#[test]
fn ack_pattern_is_fixed() {
    assert_eq!(ACK_FRAME, [0x00, 0x00, 0xFF, 0x00, 0xFF, 0x00]);
}
