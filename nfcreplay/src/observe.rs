// nfcreplay-rs/nfcreplay/src/observe.rs

//! Frame order normalizer for live polling loop observation.
//!
//! Devices under observation deliver Type F and unrecognized frames ahead
//! of their true chronological position, so one polling loop arrives as a
//! run of expedited frames followed by the rest. [`restore_original_frame_ordering`]
//! inverts that delivery using the frames' own timestamps, which come from
//! a wrapping 32-bit microsecond counter and may roll over mid-loop.

use crate::types::PollingFrame;

/// Reproduce expedited delivery: move up to `limit` expeditable frames to
/// the front of the list, keeping relative order on both sides.
pub fn apply_expedited_frame_ordering(
    frames: Vec<PollingFrame>,
    limit: usize,
) -> Vec<PollingFrame> {
    let mut expedited = Vec::new();
    let mut rest = Vec::new();
    for frame in frames {
        if frame.frame_type.is_expeditable() && expedited.len() < limit {
            expedited.push(frame);
        } else {
            rest.push(frame);
        }
    }
    expedited.extend(rest);
    expedited
}

/// Split a chronologically ordered frame run at the point where its 32-bit
/// timestamp counter rolled over. `pivot` is the reference timestamp; when
/// absent, the first frame's own timestamp is used. Frames from the first
/// backwards jump onwards count as wrapped.
fn split_frames_by_timestamp_wrap(
    frames: Vec<PollingFrame>,
    pivot: Option<u32>,
) -> (Vec<PollingFrame>, Vec<PollingFrame>) {
    let Some(pivot) = pivot.or_else(|| frames.first().map(|f| f.timestamp)) else {
        return (Vec::new(), Vec::new());
    };
    let mut not_wrapped = Vec::new();
    let mut wrapped = Vec::new();
    for frame in frames {
        if wrapped.is_empty() && frame.timestamp >= pivot {
            not_wrapped.push(frame);
        } else {
            wrapped.push(frame);
        }
    }
    (not_wrapped, wrapped)
}

/// Invert expedited delivery, interleaving the leading expedited run back
/// into the rest of the list by timestamp.
///
/// Both the expedited run and the remainder may individually cross a
/// timestamp wrap; the pre-wrap and post-wrap halves are merged
/// separately so a frame stamped just after a rollover does not sort
/// ahead of the whole loop.
pub fn restore_original_frame_ordering(frames: Vec<PollingFrame>) -> Vec<PollingFrame> {
    let split_at = frames
        .iter()
        .position(|f| !f.frame_type.is_expeditable())
        .unwrap_or(frames.len());
    let mut expedited = frames;
    let original = expedited.split_off(split_at);

    let (original_nw, original_w) = split_frames_by_timestamp_wrap(original, None);
    // The expedited run wraps relative to where the loop itself started
    let expedited_pivot = original_nw.first().map(|f| f.timestamp);
    let (expedited_nw, expedited_w) = split_frames_by_timestamp_wrap(expedited, expedited_pivot);

    let mut before_wrap = original_nw;
    before_wrap.extend(expedited_nw);
    before_wrap.sort_by_key(|f| f.timestamp);

    let mut after_wrap = original_w;
    after_wrap.extend(expedited_w);
    after_wrap.sort_by_key(|f| f.timestamp);

    before_wrap.extend(after_wrap);
    before_wrap
}
