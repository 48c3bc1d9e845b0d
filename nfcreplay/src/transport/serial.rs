// nfcreplay-rs/nfcreplay/src/transport/serial.rs

//! Serial port transport.

use std::io::Read;
use std::time::Duration;

use serialport::{ClearBuffer, SerialPort};

use crate::Result;
use crate::transport::traits::Transport;

/// Default baud rate the device speaks after power-up.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Transport over a host serial port.
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
}

impl SerialTransport {
    /// Open `path` at the default baud rate.
    pub fn open(path: &str) -> Result<Self> {
        Self::open_with_baud(path, DEFAULT_BAUD_RATE)
    }

    /// Open `path` at an explicit baud rate.
    pub fn open_with_baud(path: &str, baud_rate: u32) -> Result<Self> {
        let port = serialport::new(path, baud_rate)
            .timeout(Duration::from_millis(100))
            .open()?;
        log::debug!("opened serial port {} at {} baud", path, baud_rate);
        Ok(Self { port })
    }
}

impl Transport for SerialTransport {
    fn send(&mut self, data: &[u8]) -> Result<()> {
        use std::io::Write;
        self.port.write_all(data)?;
        Ok(())
    }

    fn receive(&mut self, len: usize, timeout_ms: u64) -> Result<Vec<u8>> {
        self.port.set_timeout(Duration::from_millis(timeout_ms))?;
        let mut buf = vec![0u8; len];
        let mut filled = 0;
        while filled < len {
            match self.port.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == std::io::ErrorKind::TimedOut => break,
                Err(e) => return Err(e.into()),
            }
        }
        buf.truncate(filled);
        Ok(buf)
    }

    fn flush_input(&mut self) -> Result<()> {
        self.port.clear(ClearBuffer::Input)?;
        Ok(())
    }

    fn flush_output(&mut self) -> Result<()> {
        use std::io::Write;
        self.port.flush()?;
        Ok(())
    }
}
