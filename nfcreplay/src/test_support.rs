// nfcreplay-rs/nfcreplay/src/test_support.rs

//! Test support helpers intended for use by unit and integration tests.
//!
//! These helpers centralize device frame construction and MockTransport
//! seeding so tests across the crate and tests/ directory can reuse the
//! same logic.
#![allow(dead_code)]

use crate::constants::{ACK_FRAME, TFI_DEVICE_TO_HOST, WIRE_POSTAMBLE, WIRE_SOF};
use crate::driver::frame::{dcs, lcs};
use crate::driver::Pn532;
use crate::transport::MockTransport;

/// Build one complete device-to-host frame around `payload`, where the
/// payload's first byte is the response opcode.
#[doc(hidden)]
pub fn device_frame(payload: &[u8]) -> Vec<u8> {
    let len = (payload.len() + 1) as u8;
    let mut frame = Vec::with_capacity(payload.len() + 8);
    frame.extend_from_slice(&WIRE_SOF);
    frame.push(len);
    frame.push(lcs(len));
    frame.push(TFI_DEVICE_TO_HOST);
    frame.extend_from_slice(payload);
    let mut body = vec![TFI_DEVICE_TO_HOST];
    body.extend_from_slice(payload);
    frame.push(dcs(&body));
    frame.push(WIRE_POSTAMBLE);
    frame
}

/// The full byte stream a device emits during a successful connection
/// handshake: firmware version, SAM configuration ack, retry configuration
/// ack, each preceded by an ACK frame.
#[doc(hidden)]
pub fn handshake_bytes() -> Vec<u8> {
    let mut bytes = Vec::new();
    // GetFirmwareVersion: IC 0x32, version/revision/support
    bytes.extend_from_slice(&ACK_FRAME);
    bytes.extend_from_slice(&device_frame(&[0x03, 0x32, 0x01, 0x06, 0x07]));
    // SAMConfiguration
    bytes.extend_from_slice(&ACK_FRAME);
    bytes.extend_from_slice(&device_frame(&[0x15]));
    // RFConfiguration (detection retries)
    bytes.extend_from_slice(&ACK_FRAME);
    bytes.extend_from_slice(&device_frame(&[0x33]));
    bytes
}

/// Open a driver handle over a MockTransport pre-seeded with the
/// connection handshake, leaving the incoming stream empty afterwards.
#[doc(hidden)]
pub fn open_with_handshake() -> Pn532<MockTransport> {
    let mut mock = MockTransport::new();
    mock.queue_bytes(&handshake_bytes());
    Pn532::open(mock).expect("mock handshake must succeed")
}
