// nfcreplay-rs/nfcreplay/src/standardize.rs

//! APDU standardizer.
//!
//! Consumes the decoder's entry stream and produces the record list the
//! replay and verification logic work from: polling entries filtered and
//! collapsed, APDU fragments reassembled into paired command/response
//! groups.

use crate::constants::{AID_START_BYTES, SELECT_AID_FIRST, SELECT_AID_SECOND};
use crate::types::{FullApduEntry, NfcType, SnoopEntry, TraceEntry};
use crate::{Result, snoop};

/// Accumulates command/response fragments until a group boundary.
#[derive(Default)]
struct ApduAccumulator {
    commands: Vec<Vec<u8>>,
    responses: Vec<Vec<u8>>,
}

impl ApduAccumulator {
    fn is_balanced(&self) -> bool {
        self.commands.len() == self.responses.len()
    }

    /// Pad an unanswered trailing command with an empty response.
    fn pad(&mut self) {
        if self.commands.len() == self.responses.len() + 1 {
            self.responses.push(Vec::new());
        }
    }

    fn flush(&mut self, timestamp_us: u64) -> Option<FullApduEntry> {
        if self.is_balanced() && !self.commands.is_empty() {
            Some(FullApduEntry {
                timestamp_us,
                commands: std::mem::take(&mut self.commands),
                responses: std::mem::take(&mut self.responses),
            })
        } else {
            None
        }
    }
}

/// Standardize a decoded entry list so it can be replayed.
///
/// Polling entries of type A or B pass through. An unrecognized-type entry
/// refines the most recent output entry (a custom broadcast annotates the
/// preceding event) or starts the output when nothing precedes it; other
/// polling types are dropped. APDU fragments accumulate into parallel
/// buffers; a command fragment starting with the SELECT AID prefix while the
/// buffers are balanced and non-empty flushes them as one completed group,
/// which is the heuristic boundary between independent transactions. A
/// response with no outstanding command is discarded as spurious.
pub fn standardize(entries: Vec<SnoopEntry>) -> Vec<TraceEntry> {
    let mut acc = ApduAccumulator::default();
    let mut last_ts = 0u64;
    let mut standardized: Vec<TraceEntry> = Vec::new();

    for entry in entries {
        match entry {
            SnoopEntry::PollingLoop(polling) => match polling.nfc_type {
                NfcType::A | NfcType::B => standardized.push(TraceEntry::PollingLoop(polling)),
                NfcType::Unknown => {
                    let refined = TraceEntry::PollingLoop(polling);
                    match standardized.last_mut() {
                        Some(last) => *last = refined,
                        None => standardized.push(refined),
                    }
                }
                _ => {}
            },
            SnoopEntry::PartialApdu(apdu) => {
                if apdu.is_command() {
                    acc.pad();
                    if !acc.commands.is_empty() && apdu.data.starts_with(&AID_START_BYTES) {
                        if let Some(full) = acc.flush(last_ts) {
                            standardized.push(TraceEntry::FullApdu(full));
                        }
                    }
                    acc.commands.push(apdu.data);
                } else {
                    if acc.is_balanced() {
                        // Spurious response with no outstanding command
                        last_ts = apdu.timestamp_us;
                        continue;
                    }
                    acc.responses.push(apdu.data);
                }
                last_ts = apdu.timestamp_us;
            }
        }
    }

    acc.pad();
    if let Some(full) = acc.flush(last_ts) {
        standardized.push(TraceEntry::FullApdu(full));
    }
    standardized
}

/// Rewrite every SELECT AID command so a trace captured against arbitrary
/// cards replays against the fixed pair of test applications: the first
/// occurrence across the whole list becomes the "first application" select,
/// every later occurrence the "second application" select. Non-AID commands,
/// entry order and count are untouched.
pub fn replace_aids(entries: Vec<TraceEntry>) -> Vec<TraceEntry> {
    let mut seen_first = false;
    entries
        .into_iter()
        .map(|entry| match entry {
            TraceEntry::FullApdu(full) => {
                let commands = full
                    .commands
                    .into_iter()
                    .map(|cmd| {
                        if cmd.starts_with(&AID_START_BYTES) {
                            if !seen_first {
                                seen_first = true;
                                SELECT_AID_FIRST.to_vec()
                            } else {
                                SELECT_AID_SECOND.to_vec()
                            }
                        } else {
                            cmd
                        }
                    })
                    .collect();
                TraceEntry::FullApdu(FullApduEntry {
                    timestamp_us: full.timestamp_us,
                    commands,
                    responses: full.responses,
                })
            }
            other => other,
        })
        .collect()
}

/// Keep only entries whose timestamp falls within the optional bounds,
/// both in microseconds and inclusive.
pub fn filter_timeframe(
    entries: Vec<TraceEntry>,
    start_us: Option<u64>,
    end_us: Option<u64>,
) -> Vec<TraceEntry> {
    entries
        .into_iter()
        .filter(|e| start_us.is_none_or(|s| e.timestamp_us() >= s))
        .filter(|e| end_us.is_none_or(|t| e.timestamp_us() <= t))
        .collect()
}

/// Decode a capture's text envelope, parse it and standardize the result.
pub fn standardize_capture(text: &str) -> Result<Vec<TraceEntry>> {
    Ok(standardize(snoop::parse_capture(text)?))
}
