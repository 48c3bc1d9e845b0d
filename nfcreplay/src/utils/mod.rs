// nfcreplay-rs/nfcreplay/src/utils/mod.rs

//! Small shared helpers.

pub mod hex;

pub use hex::{bytes_to_hex, parse_hex};
