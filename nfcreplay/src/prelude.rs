// nfcreplay-rs/nfcreplay/src/prelude.rs

pub use crate::driver::{BrTy, Command, Modulation, Pn532, RfConfigItem};
pub use crate::driver::{Target, TypeATarget, TypeBTarget};
pub use crate::observe::{apply_expedited_frame_ordering, restore_original_frame_ordering};
pub use crate::reader::{
    Reader, TransceiveConfiguration, CONFIGURATION_A_LONG, CONFIGURATION_A_SHORT,
    CONFIGURATION_B_LONG, CONFIGURATION_F_212,
};
pub use crate::snoop::{decode_capture, parse_body, parse_capture};
pub use crate::standardize::{filter_timeframe, replace_aids, standardize, standardize_capture};
#[cfg(feature = "serial")]
pub use crate::transport::SerialTransport;
pub use crate::transport::{MockTransport, Transport};
pub use crate::{
    ApduDirection, Error, ExpectedApdu, FullApduEntry, NfcType, PartialApduEntry, PollingFrame,
    PollingFrameType, PollingLoopEntry, Result, SnoopEntry, TraceEntry,
};

// Re-export small utilities for convenience
pub use crate::utils::{bytes_to_hex, parse_hex};
