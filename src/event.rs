//! Display events and import of timing exports.
//!
//! The timing capture tool exports a JSON array of marks, with times in
//! seconds since the start of the song:
//! ```json
//! [
//!   { "time": 0.0, "text": "Welcome to karaoke" },
//!   { "time": 2.004, "text": "Sing along with me" }
//! ]
//! ```

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{CdgError, Result};

/// A caption that should appear at `timestamp_ms`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayEvent {
    pub timestamp_ms: u64,
    pub text: String,
}

impl DisplayEvent {
    pub fn new(timestamp_ms: u64, text: impl Into<String>) -> Self {
        Self {
            timestamp_ms,
            text: text.into(),
        }
    }
}

#[derive(Deserialize, Debug)]
struct TimingMark {
    time: f64,
    text: String,
}

/// Parse a timing export into events (times rounded to the nearest millisecond).
///
/// Negative times, and times whose millisecond value does not fit a `u64`,
/// are rejected with [`CdgError::InvalidTimestamp`].
pub fn events_from_timing_json(content: &str) -> Result<Vec<DisplayEvent>> {
    let marks: Vec<TimingMark> =
        serde_json::from_str(content).map_err(|e| CdgError::InputError(e.to_string()))?;

    marks
        .into_iter()
        .enumerate()
        .map(|(position, mark)| {
            let millis = (mark.time * 1000.0).round();
            // u64::MAX as f64 rounds up to 2^64, which is itself out of range
            if !millis.is_finite() || millis < 0.0 || millis >= u64::MAX as f64 {
                return Err(CdgError::InvalidTimestamp {
                    position,
                    value: mark.time,
                });
            }
            Ok(DisplayEvent::new(millis as u64, mark.text))
        })
        .collect()
}

/// Read a timing export from disk.
pub fn load_timing_file(path: impl AsRef<Path>) -> Result<Vec<DisplayEvent>> {
    let content = fs::read_to_string(path)?;
    events_from_timing_json(&content)
}
