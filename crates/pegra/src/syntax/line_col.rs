//! Line and column positions.
//!
//! Converting byte offsets to line/column pairs is an error-reporting
//! concern; the matcher itself only ever sees byte offsets. [`LineIndex`]
//! precomputes line starts once and answers lookups with a binary search.

use memchr::memchr2;

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// A zero-based line/column position. Columns count UTF-8 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct LineCol {
    /// Zero-based line number.
    pub line: u32,
    /// Zero-based column, in bytes from the line start.
    pub column: u32,
}

impl LineCol {
    /// Create a position.
    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for LineCol {
    /// Renders one-based, the convention for human-facing diagnostics.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

/// Precomputed index of line-start offsets for one input.
///
/// Recognizes `\n`, `\r\n`, and lone `\r` terminators.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<u32>,
    text_len: u32,
}

impl LineIndex {
    /// Scan `text` once and build the index.
    #[must_use]
    pub fn new(text: &str) -> Self {
        let bytes = text.as_bytes();
        let mut line_starts = vec![0u32];
        let mut at = 0usize;
        while let Some(found) = memchr2(b'\n', b'\r', &bytes[at..]) {
            let terminator = at + found;
            let next = if bytes[terminator] == b'\r' && bytes.get(terminator + 1) == Some(&b'\n') {
                terminator + 2
            } else {
                terminator + 1
            };
            line_starts.push(u32::try_from(next).unwrap_or(u32::MAX));
            at = next;
        }
        Self {
            line_starts,
            text_len: u32::try_from(text.len()).unwrap_or(u32::MAX),
        }
    }

    /// Convert a byte offset to a line/column position.
    ///
    /// Offsets past the end of the text clamp to the final position.
    #[must_use]
    pub fn line_col(&self, offset: usize) -> LineCol {
        let offset = u32::try_from(offset).unwrap_or(u32::MAX).min(self.text_len);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(index) => index,
            Err(index) => index.saturating_sub(1),
        };
        LineCol {
            line: u32::try_from(line).unwrap_or(u32::MAX),
            column: offset - self.line_starts[line],
        }
    }

    /// Number of lines in the indexed text.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line() {
        let index = LineIndex::new("hello");
        assert_eq!(index.line_col(0), LineCol::new(0, 0));
        assert_eq!(index.line_col(4), LineCol::new(0, 4));
        assert_eq!(index.line_count(), 1);
    }

    #[test]
    fn test_unix_newlines() {
        let index = LineIndex::new("ab\ncd\nef");
        assert_eq!(index.line_col(0), LineCol::new(0, 0));
        assert_eq!(index.line_col(3), LineCol::new(1, 0));
        assert_eq!(index.line_col(4), LineCol::new(1, 1));
        assert_eq!(index.line_col(7), LineCol::new(2, 1));
    }

    #[test]
    fn test_windows_newlines() {
        let index = LineIndex::new("ab\r\ncd");
        assert_eq!(index.line_col(4), LineCol::new(1, 0));
        assert_eq!(index.line_count(), 2);
    }

    #[test]
    fn test_lone_carriage_return() {
        let index = LineIndex::new("a\rb");
        assert_eq!(index.line_col(2), LineCol::new(1, 0));
    }

    #[test]
    fn test_offset_clamps_to_end() {
        let index = LineIndex::new("ab");
        assert_eq!(index.line_col(100), LineCol::new(0, 2));
    }

    #[test]
    fn test_display_is_one_based() {
        assert_eq!(LineCol::new(0, 2).to_string(), "1:3");
    }
}
