//! Text spans and source text.
//!
//! Spans are byte offsets into the original source. Diagnostics carry spans;
//! the CLI converts them to line/column positions through [`SourceText`].

use std::fmt;
use std::ops::Range;

/// A byte offset into source text.
pub type TextPos = u32;

/// A half-open span of source text: a start offset and a length.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct TextSpan {
    /// The byte offset where this span starts.
    pub start: TextPos,
    /// The length of this span in bytes.
    pub length: TextPos,
}

impl TextSpan {
    #[inline]
    pub fn new(start: TextPos, length: TextPos) -> Self {
        Self { start, length }
    }

    /// Create a span from start and end offsets.
    #[inline]
    pub fn from_bounds(start: TextPos, end: TextPos) -> Self {
        debug_assert!(end >= start);
        Self {
            start,
            length: end - start,
        }
    }

    /// An empty span anchored at a position.
    #[inline]
    pub fn empty(pos: TextPos) -> Self {
        Self {
            start: pos,
            length: 0,
        }
    }

    /// The end offset of this span (exclusive).
    #[inline]
    pub fn end(&self) -> TextPos {
        self.start + self.length
    }

    /// Whether this span contains the given offset.
    #[inline]
    pub fn contains(&self, pos: TextPos) -> bool {
        pos >= self.start && pos < self.end()
    }

    /// Convert to a byte range suitable for slicing source text.
    #[inline]
    pub fn to_range(&self) -> Range<usize> {
        self.start as usize..self.end() as usize
    }

    /// The smallest span covering both `self` and `other`.
    pub fn union(&self, other: &TextSpan) -> TextSpan {
        let start = self.start.min(other.start);
        let end = self.end().max(other.end());
        TextSpan::from_bounds(start, end)
    }
}

impl fmt::Debug for TextSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end())
    }
}

impl fmt::Display for TextSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end())
    }
}

/// A line/column position derived from source text. Both are 0-based.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct LineColumn {
    pub line: u32,
    pub column: u32,
}

/// A map from byte offsets to line numbers, built once per source text.
#[derive(Debug, Clone)]
pub struct LineMap {
    /// Byte offsets of the start of each line.
    line_starts: Vec<TextPos>,
}

impl LineMap {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0u32];
        for (i, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push((i + 1) as u32);
            }
        }
        Self { line_starts }
    }

    /// The 0-based line number containing the given offset.
    pub fn line_of(&self, pos: TextPos) -> u32 {
        match self.line_starts.binary_search(&pos) {
            Ok(line) => line as u32,
            Err(line) => (line - 1) as u32,
        }
    }

    /// The 0-based line and column of the given offset.
    pub fn line_column_of(&self, pos: TextPos) -> LineColumn {
        let line = self.line_of(pos);
        let line_start = self.line_starts[line as usize];
        LineColumn {
            line,
            column: pos - line_start,
        }
    }

    /// The byte offset where the given line starts.
    pub fn line_start(&self, line: u32) -> TextPos {
        self.line_starts[line as usize]
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

/// A source file: its name, its text, and a lazily usable line map.
///
/// One `SourceText` backs one submission; every token and diagnostic span
/// produced from it indexes into `text`.
#[derive(Debug, Clone)]
pub struct SourceText {
    file_name: String,
    text: String,
    line_map: LineMap,
}

impl SourceText {
    pub fn new(file_name: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let line_map = LineMap::new(&text);
        Self {
            file_name: file_name.into(),
            text,
            line_map,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The text covered by a span.
    pub fn slice(&self, span: TextSpan) -> &str {
        &self.text[span.to_range()]
    }

    /// Line/column of a byte offset, for diagnostic rendering.
    pub fn line_column_of(&self, pos: TextPos) -> LineColumn {
        self.line_map.line_column_of(pos)
    }

    pub fn line_map(&self) -> &LineMap {
        &self.line_map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_bounds() {
        let span = TextSpan::new(5, 10);
        assert_eq!(span.end(), 15);
        assert!(span.contains(5));
        assert!(span.contains(14));
        assert!(!span.contains(15));
        assert_eq!(TextSpan::from_bounds(5, 15), span);
    }

    #[test]
    fn span_union() {
        let a = TextSpan::new(2, 3);
        let b = TextSpan::new(8, 4);
        assert_eq!(a.union(&b), TextSpan::from_bounds(2, 12));
    }

    #[test]
    fn line_map_positions() {
        let map = LineMap::new("var x = 1\nx + 2\n");
        assert_eq!(map.line_count(), 3);
        assert_eq!(map.line_of(0), 0);
        assert_eq!(map.line_of(9), 0);
        assert_eq!(map.line_of(10), 1);

        let lc = map.line_column_of(12);
        assert_eq!(lc.line, 1);
        assert_eq!(lc.column, 2);
    }

    #[test]
    fn source_text_slice() {
        let source = SourceText::new("demo.vsp", "var answer = 42");
        assert_eq!(source.slice(TextSpan::new(4, 6)), "answer");
        assert_eq!(source.file_name(), "demo.vsp");
    }
}
