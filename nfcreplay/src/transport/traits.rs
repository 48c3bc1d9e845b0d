// nfcreplay-rs/nfcreplay/src/transport/traits.rs

use crate::Result;

/// Transport trait abstracts I/O away from protocol/device logic.
///
/// The wire protocol is a byte stream with its own framing, so `receive`
/// works on byte counts rather than message boundaries: a call may return
/// fewer bytes than requested when the timeout elapses first, and returning
/// an empty buffer is how a silent device is reported.
pub trait Transport {
    /// Send raw bytes to the device
    fn send(&mut self, data: &[u8]) -> Result<()>;

    /// Receive up to `len` bytes with a timeout in milliseconds. A short
    /// or empty result means the device stopped talking before the
    /// deadline; it is not an error at this layer.
    fn receive(&mut self, len: usize, timeout_ms: u64) -> Result<Vec<u8>>;

    /// Discard any unread bytes buffered on the receive side
    fn flush_input(&mut self) -> Result<()>;

    /// Block until all written bytes have left the host
    fn flush_output(&mut self) -> Result<()>;
}
