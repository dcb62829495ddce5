/*!
 * Inline markup resolution for subtitle text blocks.
 *
 * SubRip text may carry a small set of HTML-like tags (`<b>`, `<i>`, `<u>`,
 * `<s>`). This module strips the markup from one text block and emits the
 * plain text together with a list of styled ranges, resolved through a tag
 * stack so nested tags combine their attributes.
 */

use crate::errors::ScriptError;

/// A styled span of an entry's plain text.
///
/// `offset` and `length` are Unicode codepoint indices into the plain text
/// the resolver produced, not into the raw markup. Ranges are emitted left
/// to right and never overlap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StyleRange {
    /// Codepoint offset of the range start
    pub offset: usize,
    /// Codepoint length of the range
    pub length: usize,
    /// Bold weight requested
    pub bold: bool,
    /// Italic style requested
    pub italic: bool,
    /// Underline decoration requested
    pub underline: bool,
    /// Strikethrough decoration requested
    pub strikethrough: bool,
}

impl StyleRange {
    /// True when no attribute is set on this range
    pub fn is_plain(&self) -> bool {
        !(self.bold || self.italic || self.underline || self.strikethrough)
    }
}

/// Strip inline markup from one text block.
///
/// Returns the plain text plus the style ranges covering it. The scan keeps
/// a tag stack: each literal run is closed out whenever a tag boundary is
/// hit, with attributes folded over everything currently on the stack, so
/// `<b><i>X</i></b>` yields a single bold-italic range over `X`. A closing
/// tag on an empty stack fails with [`ScriptError::UnbalancedTag`]. A `<`
/// with no matching `>` is treated as literal text to the end of the block.
pub fn resolve_markup(raw: &str) -> Result<(String, Vec<StyleRange>), ScriptError> {
    let mut text = String::with_capacity(raw.len());
    let mut text_len = 0; // codepoints in `text`
    let mut ranges = Vec::new();
    let mut stack: Vec<&str> = Vec::new();

    let mut cursor = 0;
    while let Some(rel) = raw[cursor..].find('<') {
        let open = cursor + rel;
        let Some(close_rel) = raw[open..].find('>') else {
            // Unterminated tag, keep the rest as literal text
            break;
        };
        let close = open + close_rel;

        // Close out the literal run accumulated since the last boundary
        let run = &raw[cursor..open];
        if !run.is_empty() {
            let run_len = run.chars().count();
            ranges.push(style_from_stack(text_len, run_len, &stack));
            text.push_str(run);
            text_len += run_len;
        }

        let tag = &raw[open + 1..close];
        if let Some(name) = tag.strip_prefix('/') {
            if stack.pop().is_none() {
                return Err(ScriptError::UnbalancedTag {
                    tag: name.to_string(),
                });
            }
        } else {
            stack.push(tag);
        }

        cursor = close + 1;
    }

    // Trailing literal run under whatever tags are still open
    let run = &raw[cursor..];
    if !run.is_empty() {
        let run_len = run.chars().count();
        ranges.push(style_from_stack(text_len, run_len, &stack));
        text.push_str(run);
    }

    Ok((text, ranges))
}

// Fold attributes over the whole stack, not just the top: every open tag
// contributes. Unrecognized tag names style nothing.
fn style_from_stack(offset: usize, length: usize, stack: &[&str]) -> StyleRange {
    let mut range = StyleRange {
        offset,
        length,
        ..StyleRange::default()
    };

    for tag in stack {
        match *tag {
            "b" => range.bold = true,
            "i" => range.italic = true,
            "u" => range.underline = true,
            "s" => range.strikethrough = true,
            _ => {}
        }
    }

    range
}
