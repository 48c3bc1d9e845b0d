// nfcreplay-rs/nfcreplay/src/constants.rs
//! Common protocol constants used across the crate

/// Snoop capture preamble: 1 version byte + 8-byte LE anchor timestamp
pub const SNOOP_PREAMBLE_LEN: usize = 9;

/// Per-record header: 2-byte LE length, 4-byte LE time delta, 1 flags byte
pub const SNOOP_HEADER_LEN: usize = 7;

/// Only capture format version 1 is understood
pub const SNOOP_SUPPORTED_VERSION: u8 = 1;

/// Marker lines delimiting the base64 region in a bug report / log dump
pub const SNOOP_LOG_START: &str = "BEGIN:NFCSNOOP_";
pub const SNOOP_LOG_END: &str = "END:NFCSNOOP_";

/// Signature bytes starting a polling loop notification record
pub const POLLING_LOOP_START_BYTES: [u8; 2] = [0x6F, 0x0C];

/// Signature bytes starting an APDU notification record
pub const APDU_START_BYTES: [u8; 2] = [0x6F, 0x02];

/// Index of the total length byte inside an APDU record
pub const APDU_LEN_INDEX: usize = 2;

/// Size of the APDU record main header preceding the sub-records
pub const APDU_MAIN_HEADER_SIZE: u8 = 5;

/// First sub-record offset inside an APDU record
pub const APDU_DATA_START_INDEX: usize = 6;

/// Identifier bytes at offset 4 of a valid APDU record
pub const APDU_IDENTIFIER: [u8; 2] = [0x20, 0x00];

/// Minimum length of a valid APDU command sub-record
pub const APDU_COMMAND_MIN_LENGTH: usize = 13;

/// Minimum length of a valid APDU response sub-record
pub const APDU_RESPONSE_MIN_LENGTH: usize = 10;

/// Lead byte of an APDU command sub-record
pub const APDU_COMMAND_IDENTIFIER: u8 = 0x19;

/// Lead byte of an APDU response sub-record
pub const APDU_RESPONSE_IDENTIFIER: u8 = 0x08;

/// Order markers flagging the first / second entry of a grouped exchange
pub const APDU_ORDER_FIRST: u8 = 0x02;
pub const APDU_ORDER_SECOND: u8 = 0x03;
pub const APDU_ORDER_FIRST_ALT: [u8; 2] = [0x0A, 0x00];
pub const APDU_ORDER_SECOND_ALT: [u8; 2] = [0x0B, 0x00];

/// Prefix identifying a "SELECT AID" APDU command
pub const AID_START_BYTES: [u8; 4] = [0x00, 0xA4, 0x04, 0x00];

/// Fixed AID-select commands used by the paired test applications
pub const SELECT_AID_FIRST: [u8; 13] = [
    0x00, 0xA4, 0x04, 0x00, 0x08, 0xA0, 0x00, 0x00, 0x01, 0x51, 0x00, 0x00, 0x00,
];
pub const SELECT_AID_SECOND: [u8; 13] = [
    0x00, 0xA4, 0x04, 0x00, 0x08, 0xA0, 0x00, 0x00, 0x00, 0x03, 0x00, 0x00, 0x00,
];

/// PN532 wire frame start-of-frame marker: 0x00 0x00 0xFF
pub const WIRE_SOF: [u8; 3] = [0x00, 0x00, 0xFF];

/// PN532 wire frame postamble: 0x00
pub const WIRE_POSTAMBLE: u8 = 0x00;

/// ACK handshake pattern, identical in both directions
pub const ACK_FRAME: [u8; 6] = [0x00, 0x00, 0xFF, 0x00, 0xFF, 0x00];

/// TFI byte for host-to-device frames (D4) and device-to-host frames (D5)
pub const TFI_HOST_TO_DEVICE: u8 = 0xD4;
pub const TFI_DEVICE_TO_HOST: u8 = 0xD5;

/// Number of zero bytes prepended while the long preamble is enabled
pub const LONG_PREAMBLE_LEN: usize = 20;

/// Firmware version IC byte expected from a PN532
pub const PN532_IC_VERSION: u8 = 0x32;
