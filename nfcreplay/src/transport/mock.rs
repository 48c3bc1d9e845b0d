// nfcreplay-rs/nfcreplay/src/transport/mock.rs

use std::collections::VecDeque;

use crate::Result;
use crate::transport::traits::Transport;

/// Mock transport for unit tests. It records sent payloads and serves
/// queued bytes as one continuous stream, the way a serial port would.
///
/// Queued bytes model output the device has not produced yet, so input
/// flushes are counted but do not discard them.
#[derive(Debug, Default)]
pub struct MockTransport {
    pub sent: Vec<Vec<u8>>,
    incoming: VecDeque<u8>,
    pub input_flushes: usize,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append bytes to the incoming stream.
    pub fn queue_bytes(&mut self, bytes: &[u8]) {
        self.incoming.extend(bytes.iter().copied());
    }

    /// All bytes sent so far, flattened in order.
    pub fn sent_bytes(&self) -> Vec<u8> {
        self.sent.iter().flatten().copied().collect()
    }

    pub fn pop_sent(&mut self) -> Option<Vec<u8>> {
        self.sent.pop()
    }

    pub fn pending(&self) -> usize {
        self.incoming.len()
    }
}

impl Transport for MockTransport {
    fn send(&mut self, data: &[u8]) -> Result<()> {
        self.sent.push(data.to_vec());
        Ok(())
    }

    fn receive(&mut self, len: usize, _timeout_ms: u64) -> Result<Vec<u8>> {
        let take = len.min(self.incoming.len());
        Ok(self.incoming.drain(..take).collect())
    }

    fn flush_input(&mut self) -> Result<()> {
        self.input_flushes += 1;
        Ok(())
    }

    fn flush_output(&mut self) -> Result<()> {
        Ok(())
    }
}
