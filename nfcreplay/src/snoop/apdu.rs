// nfcreplay-rs/nfcreplay/src/snoop/apdu.rs

//! APDU notification records.
//!
//! One record carries a list of sub-records, each a fragment of an APDU
//! command (reader to emulator) or response (emulator to reader). Fragment
//! framing is a lead identifier byte, a declared length, an order marker
//! flagging the first/second entry of a grouped exchange, the APDU bytes,
//! and a 4-byte trailer.

use crate::constants::{
    APDU_COMMAND_IDENTIFIER, APDU_COMMAND_MIN_LENGTH, APDU_DATA_START_INDEX, APDU_IDENTIFIER,
    APDU_LEN_INDEX, APDU_MAIN_HEADER_SIZE, APDU_ORDER_FIRST, APDU_ORDER_FIRST_ALT,
    APDU_ORDER_SECOND, APDU_ORDER_SECOND_ALT, APDU_RESPONSE_IDENTIFIER, APDU_RESPONSE_MIN_LENGTH,
};
use crate::types::{ApduDirection, PartialApduEntry};

/// Slice `data[start..len-4]`, tolerating degenerate ranges.
fn fragment_data(data: &[u8], start: usize) -> Vec<u8> {
    let end = data.len().saturating_sub(4);
    if start < end {
        data[start..end].to_vec()
    } else {
        Vec::new()
    }
}

/// Match an order marker at `at`: single byte 0x02/0x03, or the two-byte
/// alternate encoding 0A00/0B00. Returns the "is first" flag and the offset
/// where the APDU bytes begin.
fn order_marker(data: &[u8], at: usize) -> Option<(bool, usize)> {
    match data.get(at) {
        Some(&APDU_ORDER_FIRST) => Some((true, at + 1)),
        Some(&APDU_ORDER_SECOND) => Some((false, at + 1)),
        _ => match data.get(at..at + 2) {
            Some(pair) if pair == APDU_ORDER_FIRST_ALT => Some((true, at + 2)),
            Some(pair) if pair == APDU_ORDER_SECOND_ALT => Some((false, at + 2)),
            _ => None,
        },
    }
}

/// Isolate the bytes sent from the reader to the emulator.
///
/// Returns the APDU command data and the first-in-group flag, or `None` if
/// the sub-record is not a structurally valid command.
pub fn parse_apdu_command(data: &[u8]) -> Option<(Vec<u8>, bool)> {
    if data.len() < APDU_COMMAND_MIN_LENGTH {
        return None;
    }
    if data[0] != APDU_COMMAND_IDENTIFIER {
        return None;
    }
    if data[1] as usize != data.len() - 2 {
        return None;
    }
    if data[5..7] != [0x00, 0x00] {
        return None;
    }
    let (is_first, start) = order_marker(data, 8)?;
    Some((fragment_data(data, start), is_first))
}

/// Isolate the bytes sent from the emulator to the reader.
///
/// The order marker sits at index 5 (single byte), 5..7 (alternate), or 7
/// (variant framing), tried in that order.
pub fn parse_apdu_response(data: &[u8]) -> Option<(Vec<u8>, bool)> {
    if data.len() < APDU_RESPONSE_MIN_LENGTH {
        return None;
    }
    if data[0] != APDU_RESPONSE_IDENTIFIER {
        return None;
    }
    if data[1] as usize != data.len() - 2 {
        return None;
    }
    if let Some((is_first, start)) = order_marker(data, 5) {
        return Some((fragment_data(data, start), is_first));
    }
    match data.get(7) {
        Some(&APDU_ORDER_FIRST) => Some((fragment_data(data, 8), true)),
        Some(&APDU_ORDER_SECOND) => Some((fragment_data(data, 8), false)),
        _ => None,
    }
}

/// Find all APDU fragments in an APDU notification record.
///
/// Sub-records matching neither the command nor the response layout are
/// skipped; their length byte still drives the walk.
pub fn find_apdu_transactions(data: &[u8], timestamp_us: u64) -> Vec<PartialApduEntry> {
    let total_size = match data.get(APDU_LEN_INDEX) {
        Some(&b) => b,
        None => return Vec::new(),
    };
    if total_size < APDU_MAIN_HEADER_SIZE || data.get(4..6) != Some(&APDU_IDENTIFIER) {
        return Vec::new();
    }

    let mut apdus = Vec::new();
    let mut index = APDU_DATA_START_INDEX;
    while index < data.len() {
        let Some(&cur_size) = data.get(index + 1) else {
            break;
        };
        let end = (index + cur_size as usize + 2).min(data.len());
        let cur_data = &data[index..end];
        if let Some((cmd, is_first)) = parse_apdu_command(cur_data) {
            apdus.push(PartialApduEntry {
                timestamp_us,
                direction: ApduDirection::Command,
                data: cmd,
                is_first,
            });
        } else if let Some((rsp, is_first)) = parse_apdu_response(cur_data) {
            apdus.push(PartialApduEntry {
                timestamp_us,
                direction: ApduDirection::Response,
                data: rsp,
                is_first,
            });
        }
        index += cur_size as usize + 2;
    }
    apdus
}
