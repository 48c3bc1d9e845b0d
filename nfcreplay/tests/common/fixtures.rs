// fixtures.rs — provides commonly used capture bodies and envelopes
#![allow(dead_code)]

use std::io::Write;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use flate2::Compression;
use flate2::write::ZlibEncoder;

/// One polling loop sub-record: flag, pad, length byte covering a 5-byte
/// header prefix, five pad bytes, payload.
pub fn polling_sub(flag: u8, payload: &[u8]) -> Vec<u8> {
    let mut out = vec![flag, 0x00, (payload.len() + 5) as u8];
    out.extend_from_slice(&[0x00; 5]);
    out.extend_from_slice(payload);
    out
}

/// A polling loop notification record wrapping the given sub-records.
pub fn polling_record(subs: &[Vec<u8>]) -> Vec<u8> {
    let mut out = vec![0x6F, 0x0C, 0x00, 0x00];
    for sub in subs {
        out.extend_from_slice(sub);
    }
    out
}

/// An APDU command sub-record with the order marker at index 8.
pub fn command_sub(first: bool, apdu: &[u8]) -> Vec<u8> {
    let marker = if first { 0x02 } else { 0x03 };
    let mut body = vec![0x00, 0x00, 0x00, 0x00, 0x00, 0x00, marker];
    body.extend_from_slice(apdu);
    body.extend_from_slice(&[0x00; 4]);
    let mut out = vec![0x19, body.len() as u8];
    out.extend_from_slice(&body);
    out
}

/// An APDU response sub-record with the order marker at index 5.
pub fn response_sub(first: bool, apdu: &[u8]) -> Vec<u8> {
    let marker = if first { 0x02 } else { 0x03 };
    let mut body = vec![0x00, 0x00, 0x00, marker];
    body.extend_from_slice(apdu);
    body.extend_from_slice(&[0x00; 4]);
    let mut out = vec![0x08, body.len() as u8];
    out.extend_from_slice(&body);
    out
}

/// An APDU notification record wrapping the given sub-records.
pub fn apdu_record(subs: &[Vec<u8>]) -> Vec<u8> {
    let mut out = vec![0x6F, 0x02, 0x20, 0x00, 0x20, 0x00];
    for sub in subs {
        out.extend_from_slice(sub);
    }
    out
}

/// A complete capture body: version byte, 8-byte little-endian anchor
/// timestamp, then (delta, payload) records.
pub fn capture_body(anchor_us: u64, records: &[(u32, Vec<u8>)]) -> Vec<u8> {
    let mut body = vec![0x01];
    body.extend_from_slice(&anchor_us.to_le_bytes());
    for (delta, payload) in records {
        body.extend_from_slice(&(payload.len() as u16).to_le_bytes());
        body.extend_from_slice(&delta.to_le_bytes());
        body.push(0x00);
        body.extend_from_slice(payload);
    }
    body
}

/// Wrap a capture body in the text envelope a bug report carries it in:
/// verbatim preamble plus deflated record stream, base64 encoded between
/// marker lines, with unrelated report noise around it.
pub fn envelope(body: &[u8]) -> String {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&body[9..]).unwrap();
    let deflated = encoder.finish().unwrap();
    let mut raw = body[..9].to_vec();
    raw.extend_from_slice(&deflated);
    let b64 = STANDARD.encode(&raw);
    // Wrap the region at 76 columns the way dumps do
    let wrapped: Vec<&str> = b64
        .as_bytes()
        .chunks(76)
        .map(|c| std::str::from_utf8(c).unwrap())
        .collect();
    format!(
        "--- log dump start ---\nBEGIN:NFCSNOOP_LOG_SUMMARY\n{}\nEND:NFCSNOOP_LOG_SUMMARY\n--- log dump end ---\n",
        wrapped.join("\n")
    )
}

/// A SELECT AID command with a distinguishing trailing byte.
pub fn aid_select(tail: u8) -> Vec<u8> {
    let mut v = vec![0x00, 0xA4, 0x04, 0x00, 0x04, 0xA0, 0x00, 0x00];
    v.push(tail);
    v
}
