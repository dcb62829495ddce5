/*!
 * Timecode codec for SubRip-style timestamps.
 *
 * Converts between the textual `HH:MM:SS,mmm` representation and an internal
 * monotonic tick count. The tick unit is 100 nanoseconds, the reference-time
 * unit used by media pipelines, so a millisecond is 10 000 ticks.
 */

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::ScriptError;

/// Number of internal ticks per millisecond (100 ns tick unit)
pub const TICKS_PER_MILLISECOND: u64 = 10_000;

// @const: Timing line splitter, "<start> --> <end>"
static TIMING_LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\S+)\s+-->\s+(\S+)\s*$").unwrap()
});

/// A monotonic instant on the playback timeline.
///
/// Totally ordered; arithmetic is limited to comparison and range
/// containment, which is all the timing engine needs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeCode(u64);

impl TimeCode {
    /// The zero timecode, `00:00:00,000`
    pub const ZERO: TimeCode = TimeCode(0);

    /// Create a timecode from a raw tick count
    pub const fn from_ticks(ticks: u64) -> Self {
        TimeCode(ticks)
    }

    /// Create a timecode from a millisecond count
    pub const fn from_millis(millis: u64) -> Self {
        TimeCode(millis * TICKS_PER_MILLISECOND)
    }

    /// Create a timecode from broken-down clock components
    pub const fn from_components(hours: u64, minutes: u64, seconds: u64, millis: u64) -> Self {
        Self::from_millis(((hours * 60 + minutes) * 60 + seconds) * 1000 + millis)
    }

    /// Raw tick count
    pub const fn as_ticks(self) -> u64 {
        self.0
    }

    /// Whole milliseconds represented by this timecode
    pub const fn as_millis(self) -> u64 {
        self.0 / TICKS_PER_MILLISECOND
    }

    /// Parse a `HH:MM:SS,mmm` timestamp.
    ///
    /// Decomposition is strictly positional: the first `:`, the first `:`
    /// after it, the first `,` after that, and a terminating delimiter
    /// (whitespace or end-of-input) for the millisecond field. Every field
    /// must be plain unsigned decimal.
    pub fn parse(text: &str) -> Result<Self, ScriptError> {
        let trimmed = text.trim();
        let malformed = || ScriptError::MalformedTimecode {
            text: trimmed.to_string(),
        };

        let colon1 = trimmed.find(':').ok_or_else(malformed)?;
        let colon2 = trimmed[colon1 + 1..]
            .find(':')
            .map(|i| i + colon1 + 1)
            .ok_or_else(malformed)?;
        let comma = trimmed[colon2 + 1..]
            .find(',')
            .map(|i| i + colon2 + 1)
            .ok_or_else(malformed)?;
        let millis_end = trimmed[comma + 1..]
            .find(char::is_whitespace)
            .map_or(trimmed.len(), |i| i + comma + 1);

        let hours = parse_field(&trimmed[..colon1]).ok_or_else(malformed)?;
        let minutes = parse_field(&trimmed[colon1 + 1..colon2]).ok_or_else(malformed)?;
        let seconds = parse_field(&trimmed[colon2 + 1..comma]).ok_or_else(malformed)?;
        let millis = parse_field(&trimmed[comma + 1..millis_end]).ok_or_else(malformed)?;

        Ok(Self::from_components(hours, minutes, seconds, millis))
    }
}

impl fmt::Display for TimeCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let ms = self.as_millis();
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        write!(f, "{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }
}

// @returns: Field value, or None if empty or not all ASCII digits
fn parse_field(field: &str) -> Option<u64> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

/// Check whether a script line looks like a timing line.
///
/// Mirrors the loose recognition the script parser relies on: an arrow
/// marker plus at least one `:` and one `,`.
pub fn is_timing_line(line: &str) -> bool {
    line.contains("-->") && line.contains(':') && line.contains(',')
}

/// Decode a full `"<start> --> <end>"` timing line.
///
/// Each side is decoded independently; `end` is not validated to exceed
/// `start` — that is the caller's responsibility.
pub fn parse_timing_line(line: &str) -> Result<(TimeCode, TimeCode), ScriptError> {
    let caps = TIMING_LINE_REGEX
        .captures(line)
        .ok_or_else(|| ScriptError::MalformedTimecode {
            text: line.trim().to_string(),
        })?;

    let start = TimeCode::parse(&caps[1])?;
    let end = TimeCode::parse(&caps[2])?;

    Ok((start, end))
}
