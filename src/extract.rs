//! Smart statement extraction
//!
//! Finds the SQL statement the user means to run without requiring an explicit
//! selection. A non-empty selection is authoritative and returned verbatim.
//! Otherwise the statement around the cursor is bounded by the nearest `;` on
//! either side and trimmed.
//!
//! The scan is a plain character search: a `;` inside a string literal or a
//! comment still counts as a boundary.
//!
//! All offsets are character offsets (Unicode scalar values), matching what an
//! editor host reports for its caret, never byte offsets.

use serde::{Deserialize, Serialize};
use std::ops::Range;
use tracing::debug;

/// The only statement boundary recognized.
pub const DELIMITER: char = ';';

/// An editor selection expressed as anchor/head character offsets.
///
/// The anchor stays put while the head follows the caret, so the head may sit
/// before the anchor. `from()`/`to()` give the ordered bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Selection {
    pub anchor: usize,
    pub head: usize,
}

impl Selection {
    pub fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    /// An empty selection (caret) at `pos`
    pub fn cursor(pos: usize) -> Self {
        Self {
            anchor: pos,
            head: pos,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.head
    }

    pub fn from(&self) -> usize {
        self.anchor.min(self.head)
    }

    pub fn to(&self) -> usize {
        self.anchor.max(self.head)
    }

    /// Operative text for this selection in `document`
    pub fn extract(&self, document: &str) -> String {
        extract(document, self.from(), self.to())
    }
}

/// Return the text to act on for the given selection.
///
/// `selection_start == selection_end` means a bare cursor; the statement around
/// it is returned with surrounding whitespace stripped. Any other pair returns
/// `document[start..end]` exactly as typed.
///
/// Offsets past the end of the document are clamped and a reversed pair is
/// reordered, so this never panics.
pub fn extract(document: &str, selection_start: usize, selection_end: usize) -> String {
    let len = document.chars().count();
    let start = selection_start.min(selection_end).min(len);
    let end = selection_start.max(selection_end).min(len);

    if start != end {
        let from = byte_offset(document, start);
        let to = byte_offset(document, end);
        debug!("Using explicit selection {}..{}", start, end);
        return document[from..to].to_string();
    }

    let span = statement_byte_span(document, byte_offset(document, start));
    let statement = document[span].trim();
    debug!("Extracted statement at cursor {}: '{}'", start, statement);
    statement.to_string()
}

/// Character range of the (untrimmed) statement containing `cursor`.
///
/// The range excludes the delimiters themselves. A cursor placed right after a
/// `;` belongs to the following statement.
pub fn statement_bounds(document: &str, cursor: usize) -> Range<usize> {
    let len = document.chars().count();
    let cursor = cursor.min(len);
    let span = statement_byte_span(document, byte_offset(document, cursor));

    let start = document[..span.start].chars().count();
    let width = document[span.clone()].chars().count();
    start..start + width
}

/// Byte span between the delimiter before `cursor` and the one at or after it.
fn statement_byte_span(document: &str, cursor: usize) -> Range<usize> {
    // `;` is one byte wide, so +1 always lands on a char boundary
    let start = document[..cursor]
        .rfind(DELIMITER)
        .map(|i| i + 1)
        .unwrap_or(0);

    let end = document[cursor..]
        .find(DELIMITER)
        .map(|i| cursor + i)
        .unwrap_or(document.len());

    start..end
}

/// Byte index of the `chars`-th character, or the document length past the end
fn byte_offset(document: &str, chars: usize) -> usize {
    document
        .char_indices()
        .nth(chars)
        .map(|(i, _)| i)
        .unwrap_or(document.len())
}
