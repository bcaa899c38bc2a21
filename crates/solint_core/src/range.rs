//! Translation of tree ranges into editor positions.
//!
//! Trees address text by UTF-8 byte offset. Editors use zero-based lines
//! and UTF-16 code unit columns. Both sides must come from the same text
//! snapshot.

use serde::{Deserialize, Serialize};
use solint_cst::TextRange;
use thiserror::Error;

/// A zero-based line and UTF-16 column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub const fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// An editor range; `start` inclusive, `end` exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RangeError {
    /// The offset lies past the end of the text or inside a UTF-8 sequence.
    #[error("offset {offset} is outside of a {len} byte text")]
    OutOfBounds { offset: u32, len: usize },

    #[error("range start {start} is after its end {end}")]
    Inverted { start: u32, end: u32 },
}

/// Line start offsets of one text, for repeated translation.
#[derive(Debug, Clone)]
pub struct LineIndex<'t> {
    text: &'t str,
    line_starts: Vec<u32>,
}

impl<'t> LineIndex<'t> {
    /// Scans `text` once. Accepts `\n`, `\r\n` and `\r` line breaks.
    pub fn new(text: &'t str) -> Self {
        let bytes = text.as_bytes();
        let mut line_starts = vec![0];
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\n' => line_starts.push(i as u32 + 1),
                b'\r' if bytes.get(i + 1) == Some(&b'\n') => {
                    i += 1;
                    line_starts.push(i as u32 + 1);
                }
                b'\r' => line_starts.push(i as u32 + 1),
                _ => {}
            }
            i += 1;
        }
        Self { text, line_starts }
    }

    pub fn text(&self) -> &'t str {
        self.text
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    pub fn position(&self, offset: u32) -> Result<Position, RangeError> {
        let out_of_bounds = RangeError::OutOfBounds {
            offset,
            len: self.text.len(),
        };
        let at = offset as usize;
        if at > self.text.len() || !self.text.is_char_boundary(at) {
            return Err(out_of_bounds);
        }

        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let line_start = self.line_starts[line] as usize;
        let character = self
            .text
            .get(line_start..at)
            .ok_or(out_of_bounds)?
            .encode_utf16()
            .count();

        Ok(Position::new(line as u32, character as u32))
    }

    pub fn range(&self, range: TextRange) -> Result<Range, RangeError> {
        if range.start > range.end {
            return Err(RangeError::Inverted {
                start: range.start,
                end: range.end,
            });
        }
        Ok(Range::new(self.position(range.start)?, self.position(range.end)?))
    }
}

/// Translates one tree range against the text it was parsed from.
///
/// Prefer [`LineIndex`] when translating many ranges of the same text.
pub fn translate(text: &str, range: TextRange) -> Result<Range, RangeError> {
    LineIndex::new(text).range(range)
}
