// nfcreplay-rs/nfcreplay/src/snoop/polling.rs

//! Polling loop notification records.
//!
//! A single record may carry several sub-records, each describing one
//! radio-type transition or custom broadcast: a 1-byte technology flag, a
//! length byte at offset +2 (which includes a 5-byte header prefix), and the
//! payload at offset +8.

use crate::types::{NfcType, PollingLoopEntry};

/// Expand a polling loop record into zero or more entries.
///
/// A sub-record whose length byte lies past the end of the record terminates
/// the walk; everything decoded up to that point is kept. Payloads that run
/// past the end are clamped.
pub fn parse_polling_record(data: &[u8], timestamp_us: u64) -> Vec<PollingLoopEntry> {
    let mut entries = Vec::new();
    let mut count: i64 = 4;
    while (count as usize) < data.len() && count >= 0 {
        let at = count as usize;
        let nfc_type = NfcType::from_flag(data[at]);
        let Some(&len_byte) = data.get(at + 2) else {
            break;
        };
        // The length byte covers a fixed 5-byte sub-record header prefix
        let length = len_byte as i64 - 5;
        let start = count + 8;
        let end = start + length;
        let payload = if length > 0 && (start as usize) < data.len() {
            let clamped_end = (end as usize).min(data.len());
            data[start as usize..clamped_end].to_vec()
        } else {
            Vec::new()
        };
        entries.push(PollingLoopEntry {
            timestamp_us,
            nfc_type,
            data: payload,
        });
        count += 8 + length;
    }
    entries
}
