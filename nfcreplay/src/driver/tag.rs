// nfcreplay-rs/nfcreplay/src/driver/tag.rs

//! Detected target descriptors and response matching.

use crate::types::ExpectedApdu;
use crate::{Error, Result};

/// Type A target block decoded from a detection response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeATarget {
    /// Session handle, valid until the next detection or mute
    pub target_id: u8,
    pub sense_res: [u8; 2],
    pub sel_res: u8,
    pub nfcid: Vec<u8>,
    /// Present only for ISO-DEP capable targets (SEL_RES bit 0x20)
    pub ats: Vec<u8>,
}

impl TypeATarget {
    /// Decode one target block, returning the descriptor and the number of
    /// bytes consumed.
    pub fn from_target_data(data: &[u8]) -> Result<(Self, usize)> {
        if data.len() < 5 {
            return Err(Error::MalformedFrame(format!(
                "type A target block too short: {} bytes",
                data.len()
            )));
        }
        let target_id = data[0];
        let sense_res = [data[1], data[2]];
        let sel_res = data[3];
        let nfcid_length = data[4] as usize;
        let nfcid = data
            .get(5..5 + nfcid_length)
            .ok_or_else(|| Error::MalformedFrame("type A NFCID truncated".into()))?
            .to_vec();
        let mut offset = 5 + nfcid_length;
        let mut ats = Vec::new();
        if sel_res & 0x20 != 0 && data.len() > offset {
            let ats_length = data[offset] as usize;
            ats = data
                .get(offset + 1..offset + 1 + ats_length)
                .ok_or_else(|| Error::MalformedFrame("type A ATS truncated".into()))?
                .to_vec();
            offset += 1 + ats_length;
        }
        Ok((
            Self {
                target_id,
                sense_res,
                sel_res,
                nfcid,
                ats,
            },
            offset,
        ))
    }
}

/// Type B target block decoded from a detection response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeBTarget {
    pub target_id: u8,
    /// Must begin with the 0x50 marker byte
    pub sensb_res: [u8; 12],
    pub attrib_res: Vec<u8>,
}

impl TypeBTarget {
    pub fn from_target_data(data: &[u8]) -> Result<(Self, usize)> {
        if data.len() < 14 {
            return Err(Error::MalformedFrame(format!(
                "type B target block too short: {} bytes",
                data.len()
            )));
        }
        let target_id = data[0];
        let mut sensb_res = [0u8; 12];
        sensb_res.copy_from_slice(&data[1..13]);
        if sensb_res[0] != 0x50 {
            return Err(Error::MalformedFrame(format!(
                "SENSB_RES starts with {:#04x}, not 0x50",
                sensb_res[0]
            )));
        }
        let attrib_res_length = data[13] as usize;
        let attrib_res = data
            .get(14..14 + attrib_res_length)
            .ok_or_else(|| Error::MalformedFrame("type B ATTRIB_RES truncated".into()))?
            .to_vec();
        let offset = 14 + attrib_res_length;
        Ok((
            Self {
                target_id,
                sensb_res,
                attrib_res,
            },
            offset,
        ))
    }

    /// NFCID0 bytes embedded in the SENSB_RES.
    pub fn nfcid(&self) -> &[u8] {
        &self.sensb_res[1..5]
    }
}

/// A detected target of either supported technology.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    TypeA(TypeATarget),
    TypeB(TypeBTarget),
}

impl Target {
    pub fn target_id(&self) -> u8 {
        match self {
            Self::TypeA(t) => t.target_id,
            Self::TypeB(t) => t.target_id,
        }
    }
}

/// Compare an actual tag response against an expected one.
///
/// Exact equality matches. As a concession to captures that omit the
/// leading status byte, a non-zero-led expectation also matches an actual
/// response that carries an extra leading zero byte. Empty on either side
/// never matches.
pub fn responses_match(expected: &[u8], actual: Option<&[u8]>) -> bool {
    let Some(actual) = actual else {
        return false;
    };
    if expected == actual {
        return true;
    }
    if expected.is_empty() || actual.is_empty() {
        return false;
    }
    expected[0] != 0x00 && actual[0] == 0x00 && expected == &actual[1..]
}

/// True when the expectation accepts the actual response, including the
/// wildcard case.
pub fn expected_matches(expected: &ExpectedApdu, actual: Option<&[u8]>) -> bool {
    match expected {
        ExpectedApdu::Any => true,
        ExpectedApdu::Data(data) => responses_match(data, actual),
    }
}
