// nfcreplay-rs/nfcreplay/src/snoop/capture.rs

//! Text envelope of a snoop capture.
//!
//! Captures travel inside bug reports as a base64 region delimited by fixed
//! marker lines. Decoding the region yields a 9-byte preamble stored as-is
//! followed by a zlib-deflated record stream.

use std::io::Read;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use flate2::read::ZlibDecoder;

use crate::constants::{SNOOP_LOG_END, SNOOP_LOG_START, SNOOP_PREAMBLE_LEN};
use crate::{Error, Result};

/// Extract the base64 region between the begin/end marker lines.
fn extract_region(text: &str) -> Result<String> {
    let mut region = String::new();
    let mut found = false;
    for line in text.lines() {
        if !found {
            if line.contains(SNOOP_LOG_START) {
                found = true;
            }
        } else {
            if line.contains(SNOOP_LOG_END) {
                return Ok(region);
            }
            region.push_str(line.trim());
        }
    }
    if !found {
        return Err(Error::CaptureEnvelope(format!(
            "missing {} marker",
            SNOOP_LOG_START
        )));
    }
    // A missing end marker just means the region ran to the end of the text
    Ok(region)
}

/// Inflate the deflated record stream, keeping the preamble verbatim.
fn inflate(data: &[u8]) -> Result<Vec<u8>> {
    if data.len() < SNOOP_PREAMBLE_LEN {
        return Err(Error::TruncatedCapture {
            needed: SNOOP_PREAMBLE_LEN,
            got: data.len(),
        });
    }
    let mut out = data[..SNOOP_PREAMBLE_LEN].to_vec();
    let mut decoder = ZlibDecoder::new(&data[SNOOP_PREAMBLE_LEN..]);
    decoder.read_to_end(&mut out)?;
    Ok(out)
}

/// Decode a capture's text envelope into the binary body handed to
/// [`crate::snoop::parse_body`].
pub fn decode_capture(text: &str) -> Result<Vec<u8>> {
    let region = extract_region(text)?;
    let raw = STANDARD
        .decode(region.as_bytes())
        .map_err(|e| Error::CaptureEnvelope(format!("invalid base64 region: {}", e)))?;
    inflate(&raw)
}
