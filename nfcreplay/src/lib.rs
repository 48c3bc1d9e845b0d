// nfcreplay-rs/nfcreplay/src/lib.rs

//! nfcreplay
//!
//! Decode NFC snoop captures, standardize the traced APDU exchanges, and
//! replay them against live hardware through a PN532 reader, plus helpers
//! for normalizing polling frames observed from a device under test.
#![warn(missing_docs)]

pub mod constants;
pub mod driver;
pub mod error;
pub mod observe;
pub mod prelude;
pub mod reader;
pub mod snoop;
pub mod standardize;
pub mod test_support;
pub mod transport;
pub mod types;
pub mod utils;

// Re-export common types at crate root so `crate::Error`, `crate::Result`,
// and the data model in `types` are available for consumers and for
// convenient `prelude` re-exports.
pub use crate::error::*;
pub use crate::types::*;

pub use prelude::*;
