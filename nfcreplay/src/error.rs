// nfcreplay-rs/nfcreplay/src/error.rs

use thiserror::Error;

/// Crate-wide error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error("unsupported snoop log version: {0}")]
    UnsupportedVersion(u8),

    #[error("truncated capture: needed {needed} bytes, got {got}")]
    TruncatedCapture { needed: usize, got: usize },

    #[error("capture envelope error: {0}")]
    CaptureEnvelope(String),

    #[error("malformed frame: {0}")]
    MalformedFrame(String),

    #[error("invalid length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("no response for command {command:#04x}")]
    NoResponse { command: u8 },

    #[error("response code {actual:#04x} does not match command {command:#04x}")]
    OpcodeMismatch { command: u8, actual: u8 },

    #[error("response too short for command {command:#04x}: {actual} < {min}")]
    ResponseTooShort {
        command: u8,
        min: usize,
        actual: usize,
    },

    #[error("device returned error status {status:#04x}")]
    ErrorStatus { status: u8 },

    #[error("unsupported modulation: {0}")]
    UnsupportedModulation(String),

    #[error("no target selected: detect a tag before transacting")]
    NoTarget,

    // Serial hardware support is an optional dependency so the decoder and
    // normalizer remain usable without any native libraries.
    #[cfg(feature = "serial")]
    #[error("serial error: {0}")]
    Serial(#[from] serialport::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
