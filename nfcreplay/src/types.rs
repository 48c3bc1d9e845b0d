// nfcreplay-rs/nfcreplay/src/types.rs

//! Data model shared by the decoder, standardizer, driver and normalizer.

/// Radio technology of a decoded polling loop entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NfcType {
    A,
    B,
    F,
    V,
    RemoteField,
    Unknown,
}

impl NfcType {
    /// Map the flag byte of a polling sub-record to a technology.
    pub fn from_flag(flag: u8) -> Self {
        match flag {
            0 => Self::RemoteField,
            1 => Self::A,
            2 => Self::B,
            _ => Self::Unknown,
        }
    }
}

/// Direction of an APDU fragment relative to the reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ApduDirection {
    Command,
    Response,
}

/// One polling loop event decoded from a capture, absolutely timestamped.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PollingLoopEntry {
    /// Absolute timestamp in microseconds
    pub timestamp_us: u64,
    pub nfc_type: NfcType,
    pub data: Vec<u8>,
}

/// One APDU fragment decoded from a capture. Ephemeral: the standardizer
/// consumes these and emits [`FullApduEntry`] groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialApduEntry {
    /// Absolute timestamp in microseconds
    pub timestamp_us: u64,
    pub direction: ApduDirection,
    pub data: Vec<u8>,
    /// Whether this fragment was flagged first in a multi-part group
    pub is_first: bool,
}

impl PartialApduEntry {
    pub fn is_command(&self) -> bool {
        self.direction == ApduDirection::Command
    }
}

/// A completed command/response exchange group.
///
/// Invariant: `commands.len() == responses.len()` once produced by the
/// standardizer (an unanswered command is padded with an empty response).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FullApduEntry {
    /// Timestamp of the last fragment folded into this group, microseconds
    pub timestamp_us: u64,
    pub commands: Vec<Vec<u8>>,
    pub responses: Vec<Vec<u8>>,
}

/// Decoder output: a polling loop event or an APDU fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnoopEntry {
    PollingLoop(PollingLoopEntry),
    PartialApdu(PartialApduEntry),
}

impl SnoopEntry {
    /// Timestamp of the entry, microseconds.
    pub fn timestamp_us(&self) -> u64 {
        match self {
            Self::PollingLoop(e) => e.timestamp_us,
            Self::PartialApdu(e) => e.timestamp_us,
        }
    }
}

/// Standardizer output: a polling loop event or a full APDU exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TraceEntry {
    PollingLoop(PollingLoopEntry),
    FullApdu(FullApduEntry),
}

impl TraceEntry {
    /// Timestamp of the entry, microseconds.
    pub fn timestamp_us(&self) -> u64 {
        match self {
            Self::PollingLoop(e) => e.timestamp_us,
            Self::FullApdu(e) => e.timestamp_us,
        }
    }
}

/// Polling loop event type reported by a device under observation.
///
/// `O`/`X` are field-on/field-off pseudo events, `U` is an unrecognized
/// (custom) frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PollingFrameType {
    A,
    B,
    F,
    O,
    X,
    U,
}

impl PollingFrameType {
    /// Frames of these types are delivered to observers ahead of their true
    /// chronological position.
    pub fn is_expeditable(self) -> bool {
        matches!(self, Self::F | Self::U)
    }
}

/// A polling frame observed live from a device under test.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PollingFrame {
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub frame_type: PollingFrameType,
    pub data: Vec<u8>,
    /// Device-side wrapping 32-bit microsecond counter
    pub timestamp: u32,
    #[cfg_attr(feature = "serde", serde(alias = "triggered_auto_transact"))]
    pub triggered_auto_transact: bool,
    #[cfg_attr(feature = "serde", serde(alias = "vendor_specific_gain"))]
    pub vendor_specific_gain: i32,
}

impl PollingFrame {
    /// Build a bare frame with only type and timestamp set, as produced by
    /// devices that report no payload for on/off events.
    pub fn bare(frame_type: PollingFrameType, timestamp: u32) -> Self {
        Self {
            frame_type,
            data: Vec::new(),
            timestamp,
            triggered_auto_transact: false,
            vendor_specific_gain: 0,
        }
    }
}

/// Expected response entry for a tag transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpectedApdu {
    /// The `"*"` wildcard: any actual response is accepted
    Any,
    /// Concrete expected bytes; empty means "no response expected"
    Data(Vec<u8>),
}

impl ExpectedApdu {
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Data(d) if d.is_empty())
    }
}

impl From<&[u8]> for ExpectedApdu {
    fn from(data: &[u8]) -> Self {
        Self::Data(data.to_vec())
    }
}

impl From<Vec<u8>> for ExpectedApdu {
    fn from(data: Vec<u8>) -> Self {
        Self::Data(data)
    }
}
