/*!
 * SubRip script parsing.
 *
 * Drives the timecode codec and the markup resolver over a full script and
 * populates a [`TimedEntryStore`]. The parse pass runs to completion before
 * any playback query is issued against the resulting store.
 *
 * Two recovery policies are supported. `Strict` aborts the whole parse on
 * the first structural error, matching the reference filter. `Lenient`, the
 * default, skips the offending entry, records a diagnostic, and resumes at
 * the next block boundary, so callers can tell "no subtitles" apart from
 * "corrupt script" by inspecting the diagnostics list.
 */

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::errors::ScriptError;
use crate::markup::resolve_markup;
use crate::store::{SubtitleEntry, TimedEntryStore};
use crate::timecode::{is_timing_line, parse_timing_line};

/// Recovery policy applied when a script entry fails to parse
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ParsePolicy {
    /// Abort the whole parse on the first error
    Strict,
    /// Skip the malformed entry, record a diagnostic, keep going
    #[default]
    Lenient,
}

/// A recorded parse problem: the entry it belongs to was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDiagnostic {
    /// One-based line number of the entry's timing line (or where one was
    /// expected)
    pub line: usize,
    /// The underlying error
    pub error: ScriptError,
}

impl fmt::Display for ParseDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.error)
    }
}

/// Result of a parse pass: the populated store plus whatever was skipped
#[derive(Debug, Default)]
pub struct ScriptDocument {
    /// Entries that parsed cleanly, indexed by start time
    pub store: TimedEntryStore,
    /// Problems encountered under the lenient policy (always empty under
    /// strict, which fails instead)
    pub diagnostics: Vec<ParseDiagnostic>,
}

impl ScriptDocument {
    /// True when the parse produced neither entries nor diagnostics
    pub fn is_empty(&self) -> bool {
        self.store.is_empty() && self.diagnostics.is_empty()
    }
}

/// Parse a full script into a [`ScriptDocument`].
///
/// Line state machine: an optional digits-only ordinal line, a timing line,
/// one or more text lines joined with `\n`, and a blank terminator. Markup
/// is resolved per block via [`resolve_markup`].
pub fn parse_script(content: &str, policy: ParsePolicy) -> Result<ScriptDocument, ScriptError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let lines: Vec<&str> = content.lines().collect();

    let mut document = ScriptDocument::default();
    let mut i = 0;

    while i < lines.len() {
        let trimmed = lines[i].trim();

        // Blank separators and entry ordinals carry no data
        if trimmed.is_empty() || is_ordinal(trimmed) {
            i += 1;
            continue;
        }

        let timing_line_no = i + 1;

        if !is_timing_line(trimmed) {
            let error = ScriptError::MalformedScript {
                line: timing_line_no,
                reason: format!("expected a timing line, found {:?}", trimmed),
            };
            i = recover(&mut document, &lines, i, timing_line_no, error, policy)?;
            continue;
        }

        let (start, end) = match parse_timing_line(trimmed) {
            Ok(times) => times,
            Err(error) => {
                i = recover(&mut document, &lines, i, timing_line_no, error, policy)?;
                continue;
            }
        };

        // Merge text lines until a blank line or end-of-input
        let mut block = String::new();
        let mut j = i + 1;
        while j < lines.len() && !lines[j].trim().is_empty() {
            if !block.is_empty() {
                block.push('\n');
            }
            block.push_str(lines[j]);
            j += 1;
        }

        if block.is_empty() {
            let reason = if j >= lines.len() {
                "unterminated entry block at end of input".to_string()
            } else {
                "entry block contains no text".to_string()
            };
            let error = ScriptError::MalformedScript {
                line: timing_line_no,
                reason,
            };
            i = recover(&mut document, &lines, i, timing_line_no, error, policy)?;
            continue;
        }

        match resolve_markup(&block) {
            Ok((text, style_ranges)) => {
                if start > end {
                    warn!(
                        "Entry at line {} ends before it starts ({} --> {})",
                        timing_line_no, start, end
                    );
                }
                debug!(
                    "Parsed entry {} --> {} ({} range(s))",
                    start,
                    end,
                    style_ranges.len()
                );
                document
                    .store
                    .insert(SubtitleEntry::new(start, end, text, style_ranges));
            }
            Err(error) => {
                i = recover(&mut document, &lines, i, timing_line_no, error, policy)?;
                continue;
            }
        }

        // Advance past the blank terminator, never beyond it
        i = j + 1;
    }

    info!(
        "Parsed {} subtitle entries ({} skipped)",
        document.store.len(),
        document.diagnostics.len()
    );

    Ok(document)
}

/// Read and parse a script file
pub fn parse_script_file<P: AsRef<Path>>(path: P, policy: ParsePolicy) -> Result<ScriptDocument> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script file: {}", path.display()))?;

    parse_script(&content, policy)
        .with_context(|| format!("Failed to parse script file: {}", path.display()))
}

// Apply the recovery policy to one failed entry. Under lenient, records the
// diagnostic and returns the index of the next block boundary; under
// strict, propagates the error.
fn recover(
    document: &mut ScriptDocument,
    lines: &[&str],
    at: usize,
    line_no: usize,
    error: ScriptError,
    policy: ParsePolicy,
) -> Result<usize, ScriptError> {
    match policy {
        ParsePolicy::Strict => Err(error),
        ParsePolicy::Lenient => {
            warn!("Skipping entry at line {}: {}", line_no, error);
            document.diagnostics.push(ParseDiagnostic {
                line: line_no,
                error,
            });

            let mut next = at;
            while next < lines.len() && !lines[next].trim().is_empty() {
                next += 1;
            }
            Ok(next + 1)
        }
    }
}

// An entry ordinal line contains nothing but decimal digits
fn is_ordinal(line: &str) -> bool {
    !line.is_empty() && line.bytes().all(|b| b.is_ascii_digit())
}
