// nfcreplay-rs/nfcreplay/src/transport/mod.rs

//! Transport layer: byte-stream I/O beneath the wire protocol driver.

pub mod mock;
#[cfg(feature = "serial")]
pub mod serial;
pub mod traits;

pub use mock::MockTransport;
#[cfg(feature = "serial")]
pub use serial::SerialTransport;
pub use traits::Transport;
