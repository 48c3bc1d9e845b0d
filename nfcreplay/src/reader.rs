// nfcreplay-rs/nfcreplay/src/reader.rs

//! Reader capability surface.
//!
//! Replay and verification logic depends only on this trait, so a serial
//! hardware driver and a remote or virtual backend are interchangeable.

use std::time::Duration;

use crate::driver::commands::Modulation;
use crate::driver::tag::{TypeATarget, TypeBTarget};
use crate::types::ExpectedApdu;
use crate::Result;

/// Modulation, timing and power settings for one broadcast frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransceiveConfiguration {
    pub modulation: Modulation,
    /// Append a hardware-computed CRC to the frame
    pub crc: bool,
    /// Bits sent of the last byte; 8 for full-byte frames
    pub bits: u8,
    pub bitrate_kbps: u16,
    pub timeout: Duration,
    /// 0-100 output power level
    pub power_level: u8,
}

impl TransceiveConfiguration {
    pub fn with_power_level(mut self, power_level: u8) -> Self {
        self.power_level = power_level;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Full-byte Type A frame with CRC; the timeout covers the standard Type A
/// response window at the 13.56 MHz carrier.
pub const CONFIGURATION_A_LONG: TransceiveConfiguration = TransceiveConfiguration {
    modulation: Modulation::TypeA,
    crc: true,
    bits: 8,
    bitrate_kbps: 106,
    timeout: Duration::from_nanos(119_469),
    power_level: 100,
};

/// 7-bit short Type A frame (REQA/WUPA style), no CRC.
pub const CONFIGURATION_A_SHORT: TransceiveConfiguration = TransceiveConfiguration {
    modulation: Modulation::TypeA,
    crc: false,
    bits: 7,
    bitrate_kbps: 106,
    timeout: Duration::from_nanos(119_469),
    power_level: 100,
};

/// Full-byte Type B frame with CRC.
pub const CONFIGURATION_B_LONG: TransceiveConfiguration = TransceiveConfiguration {
    modulation: Modulation::TypeB,
    crc: true,
    bits: 8,
    bitrate_kbps: 106,
    timeout: Duration::from_nanos(566_372),
    power_level: 100,
};

/// Type F frame at 212 kbps.
pub const CONFIGURATION_F_212: TransceiveConfiguration = TransceiveConfiguration {
    modulation: Modulation::TypeF,
    crc: true,
    bits: 8,
    bitrate_kbps: 212,
    timeout: Duration::from_nanos(501_475),
    power_level: 100,
};

/// Operations every reader backend must provide.
pub trait Reader {
    /// Attempt to detect a Type A target.
    fn poll_a(&mut self) -> Result<Option<TypeATarget>>;

    /// Attempt to detect a Type B target with the given application family
    /// identifier.
    fn poll_b(&mut self, afi: u8) -> Result<Option<TypeBTarget>>;

    /// Emit one free-form frame into the polling loop, returning whatever
    /// the field answered.
    fn send_broadcast(
        &mut self,
        data: &[u8],
        configuration: &TransceiveConfiguration,
    ) -> Result<Option<Vec<u8>>>;

    /// Turn the RF field off.
    fn mute(&mut self) -> Result<()>;

    /// Turn the RF field on.
    fn unmute(&mut self) -> Result<()>;

    /// Drop any buffered leftover wire data.
    fn reset(&mut self) -> Result<()>;

    /// Exchange the command list with the currently detected tag and check
    /// each actual response against the expected one. Returns whether every
    /// exchange matched.
    fn transact(&mut self, commands: &[Vec<u8>], responses: &[ExpectedApdu]) -> Result<bool>;
}
