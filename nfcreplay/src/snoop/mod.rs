// nfcreplay-rs/nfcreplay/src/snoop/mod.rs

//! Snoop log decoder.
//!
//! Turns the binary body of an NFC snoop capture into an ordered list of
//! absolutely-timestamped [`SnoopEntry`] values. The capture stores only a
//! relative time delta per record plus one absolute anchor timestamp for the
//! *last* record, so decoding takes two passes: a backward pass accumulating
//! all deltas to recover the starting timestamp, then a forward pass
//! assigning each record its absolute time. Do not collapse this into a
//! single pass; the resulting timestamps differ.

pub mod apdu;
pub mod capture;
pub mod polling;

pub use apdu::{find_apdu_transactions, parse_apdu_command, parse_apdu_response};
pub use capture::decode_capture;
pub use polling::parse_polling_record;

use crate::constants::{
    APDU_START_BYTES, POLLING_LOOP_START_BYTES, SNOOP_HEADER_LEN, SNOOP_PREAMBLE_LEN,
    SNOOP_SUPPORTED_VERSION,
};
use crate::types::SnoopEntry;
use crate::{Error, Result};

/// Raw top-level transaction record, before notification filtering.
#[derive(Debug, Clone, Copy)]
pub struct RawTransactionRecord<'a> {
    /// Microseconds elapsed since the previous record
    pub delta_us: u32,
    /// Payload bytes; the first byte's top 3 bits carry the transaction type
    pub payload: &'a [u8],
}

impl RawTransactionRecord<'_> {
    /// Transaction type code (top 3 bits of the first payload byte). Only
    /// code 3 (notification) carries data this decoder consumes.
    pub fn transaction_type(&self) -> u8 {
        self.payload.first().map_or(0, |b| (b & 0xE0) >> 5)
    }
}

/// Iterator over the top-level records of a capture body.
///
/// Yields `Err(TruncatedCapture)` and stops if a record's declared payload
/// extends past the end of the buffer; decoding must then abort entirely
/// because every later timestamp depends on every earlier delta.
struct Records<'a> {
    body: &'a [u8],
    offset: usize,
    failed: bool,
}

impl<'a> Records<'a> {
    fn new(body: &'a [u8]) -> Self {
        Self {
            body,
            offset: SNOOP_PREAMBLE_LEN,
            failed: false,
        }
    }
}

impl<'a> Iterator for Records<'a> {
    type Item = Result<RawTransactionRecord<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.body.len().saturating_sub(self.offset) <= SNOOP_HEADER_LEN {
            return None;
        }
        let at = self.offset;
        let length = u16::from_le_bytes([self.body[at], self.body[at + 1]]) as usize;
        let delta_us = u32::from_le_bytes([
            self.body[at + 2],
            self.body[at + 3],
            self.body[at + 4],
            self.body[at + 5],
        ]);
        let start = at + SNOOP_HEADER_LEN;
        let end = start + length;
        if end > self.body.len() {
            self.failed = true;
            return Some(Err(Error::TruncatedCapture {
                needed: end,
                got: self.body.len(),
            }));
        }
        self.offset = end;
        Some(Ok(RawTransactionRecord {
            delta_us,
            payload: &self.body[start..end],
        }))
    }
}

/// Read the anchor timestamp and validate the preamble.
fn read_preamble(body: &[u8]) -> Result<u64> {
    if body.is_empty() {
        return Err(Error::TruncatedCapture {
            needed: SNOOP_PREAMBLE_LEN,
            got: 0,
        });
    }
    let version = body[0];
    if version != SNOOP_SUPPORTED_VERSION {
        return Err(Error::UnsupportedVersion(version));
    }
    if body.len() < SNOOP_PREAMBLE_LEN {
        return Err(Error::TruncatedCapture {
            needed: SNOOP_PREAMBLE_LEN,
            got: body.len(),
        });
    }
    let mut anchor = [0u8; 8];
    anchor.copy_from_slice(&body[1..SNOOP_PREAMBLE_LEN]);
    Ok(u64::from_le_bytes(anchor))
}

/// Compute the absolute timestamp of the first record.
///
/// The preamble anchors the *last* record, so the deltas of every record are
/// summed and subtracted from the anchor.
pub fn calculate_start_timestamp(body: &[u8]) -> Result<u64> {
    let mut ts = read_preamble(body)?;
    for record in Records::new(body) {
        ts = ts.wrapping_sub(record?.delta_us as u64);
    }
    Ok(ts)
}

/// Decode a capture body (preamble + records) into ordered entries.
///
/// Records that are not notifications, or whose payload matches neither the
/// polling loop nor the APDU signature, are dropped silently. Structural
/// truncation is fatal; no partial results are returned.
pub fn parse_body(body: &[u8]) -> Result<Vec<SnoopEntry>> {
    let mut ts = calculate_start_timestamp(body)?;
    let mut entries = Vec::new();
    for record in Records::new(body) {
        let record = record?;
        ts = ts.wrapping_add(record.delta_us as u64);
        if record.transaction_type() != 3 {
            continue;
        }
        if record.payload.starts_with(&POLLING_LOOP_START_BYTES) {
            entries.extend(
                parse_polling_record(record.payload, ts)
                    .into_iter()
                    .map(SnoopEntry::PollingLoop),
            );
        } else if record.payload.starts_with(&APDU_START_BYTES) {
            entries.extend(
                find_apdu_transactions(record.payload, ts)
                    .into_iter()
                    .map(SnoopEntry::PartialApdu),
            );
        }
    }
    Ok(entries)
}

/// Decode the text envelope of a capture and parse its body.
pub fn parse_capture(text: &str) -> Result<Vec<SnoopEntry>> {
    let body = decode_capture(text)?;
    parse_body(&body)
}
