// nfcreplay-rs/nfcreplay/src/driver/commands.rs

//! Command opcodes, device parameter tables and modulation lookups.

use std::time::Duration;

use crate::{Error, Result};

/// Command opcodes understood by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Command {
    Diagnose = 0x00,
    GetFirmwareVersion = 0x02,
    GetGeneralStatus = 0x04,
    ReadRegister = 0x06,
    WriteRegister = 0x08,
    SamConfiguration = 0x14,
    PowerDown = 0x16,
    RfConfiguration = 0x32,
    InListPassiveTarget = 0x4A,
    InDataExchange = 0x40,
    InCommunicateThru = 0x42,
    InDeselect = 0x44,
    InRelease = 0x52,
    InSelect = 0x54,
}

impl Command {
    pub fn opcode(self) -> u8 {
        self as u8
    }

    /// Opcode the device echoes in its response.
    pub fn response_opcode(self) -> u8 {
        self.opcode() + 1
    }
}

/// RF configuration items selectable by the RfConfiguration command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RfConfigItem {
    /// ConfigurationData: field on/off and auto RFCA
    RfField = 0x01,
    /// RFU, fATR_RES_Timeout, fRetryTimeout
    VariousTimings = 0x02,
    MaxRtyCom = 0x04,
    /// MxRtyATR, MxRtyPSL, MxRtyPassiveActivation
    MaxRetries = 0x05,
}

/// Baud rate / modulation selector for target detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BrTy {
    /// InitiatorData may contain a UID to initialize
    TypeA106 = 0x00,
    /// InitiatorData contains the polling command payload
    TypeF212 = 0x01,
    TypeF424 = 0x02,
    /// InitiatorData contains AFI and optional polling method byte
    TypeB106 = 0x03,
    /// InitiatorData field unused
    TypeAJewel = 0x04,
}

/// Status byte the device prefixes to data-exchange responses.
pub const STATUS_OK: u8 = 0x00;

/// Radio modulation for raw transceive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modulation {
    TypeA,
    TypeB,
    TypeF,
}

impl Modulation {
    /// Framing field value for the TxMode/RxMode registers.
    pub fn framing(self) -> u8 {
        match self {
            Self::TypeA => 0b00,
            Self::TypeF => 0b10,
            Self::TypeB => 0b11,
        }
    }
}

/// Speed field value for the TxMode/RxMode registers.
pub fn bitrate_code(bitrate_kbps: u16) -> Result<u8> {
    match bitrate_kbps {
        106 => Ok(0b000),
        212 => Ok(0b001),
        424 => Ok(0b010),
        848 => Ok(0b011),
        other => Err(Error::UnsupportedModulation(format!(
            "bitrate {} kbps",
            other
        ))),
    }
}

/// Hardware timeout steps: index n covers 100 * 2^(n-1) µs, n in 1..=15.
const TIMEOUT_STEP_COUNT: u8 = 0x0F;
const TIMEOUT_FALLBACK_INDEX: u8 = 0x10;

/// Map a requested timeout to the smallest hardware timeout index whose
/// duration is at least as long. Requests beyond the largest step fall
/// back to the maximum index.
pub fn timeout_index(timeout: Duration) -> u8 {
    let micros = timeout.as_micros();
    for n in 1..=TIMEOUT_STEP_COUNT {
        if 100u128 << (n - 1) >= micros {
            return n;
        }
    }
    TIMEOUT_FALLBACK_INDEX
}

/// RF driver conductance presets keyed by power-level breakpoint:
/// (p-driver CWGsP value, n-driver GsNOn value). Both columns are
/// non-decreasing in the breakpoint.
const POWER_PRESETS: [(u8, (u8, u8)); 6] = [
    (0, (0b000000, 0b0000)),
    (20, (0b000001, 0b0001)),
    (40, (0b000010, 0b0010)),
    (60, (0b000011, 0b0100)),
    (80, (0b001000, 0b1000)),
    (100, (0b111111, 0b1111)),
];

/// Pick the conductance preset for a 0-100 power level: the smallest
/// breakpoint at or above the request. Out-of-range requests get the
/// zero-power preset.
pub fn power_preset(power_level: u8) -> (u8, u8) {
    POWER_PRESETS
        .iter()
        .find(|(breakpoint, _)| *breakpoint >= power_level)
        .map(|(_, config)| *config)
        .unwrap_or(POWER_PRESETS[0].1)
}
