// nfcreplay-rs/nfcreplay/src/driver/frame.rs

//! Wire frame codec.
//!
//! Format: `[SOF(3)] [Len(1)] [LCS(1)] [TFI(1)] [Payload(n)] [DCS(1)] [Postamble(1)]`
//! where Len counts TFI plus payload. SOF is `00 00 FF`, postamble `0x00`.
//! The ACK handshake pattern `00 00 FF 00 FF 00` is identical in both
//! directions and carries no payload.

use crate::constants::{LONG_PREAMBLE_LEN, TFI_HOST_TO_DEVICE, WIRE_POSTAMBLE, WIRE_SOF};
use crate::{Error, Result};

/// Compute the length checksum: LCS = 0x100 - len (mod 256).
pub fn lcs(len: u8) -> u8 {
    0u8.wrapping_sub(len)
}

/// Compute the data checksum over TFI + payload:
/// DCS = 0x100 - (sum(data) & 0xff).
pub fn dcs(data: &[u8]) -> u8 {
    let sum = data.iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
    0u8.wrapping_sub(sum)
}

/// Host-to-device frame builder.
pub struct Frame;

impl Frame {
    /// Encode `data` (opcode + arguments) into a full host frame.
    ///
    /// When `long_preamble` is set, a run of zero bytes is prepended; the
    /// device needs it to synchronize before its first configuration.
    pub fn encode(data: &[u8], long_preamble: bool) -> Result<Vec<u8>> {
        // Len counts the TFI byte as well
        if data.len() + 1 > 255 {
            return Err(Error::InvalidLength {
                expected: 254,
                actual: data.len(),
            });
        }
        let len = (data.len() + 1) as u8;
        let preamble = if long_preamble { LONG_PREAMBLE_LEN } else { 0 };
        let mut out = Vec::with_capacity(preamble + 3 + 1 + 1 + 1 + data.len() + 1 + 1);
        out.resize(preamble, 0x00);
        out.extend_from_slice(&WIRE_SOF);
        out.push(len);
        out.push(lcs(len));
        out.push(TFI_HOST_TO_DEVICE);
        out.extend_from_slice(data);
        let mut body = vec![TFI_HOST_TO_DEVICE];
        body.extend_from_slice(data);
        out.push(dcs(&body));
        out.push(WIRE_POSTAMBLE);
        Ok(out)
    }
}
