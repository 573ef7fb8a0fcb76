//! Span - Source code location
//!
//! A Span is a byte range of one source buffer together with the line and
//! column at each end, so diagnostics can point at the exact token.

/// A position in the source buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    /// Line (1-indexed)
    pub line: u32,
    /// Column (0-indexed, reset at each line terminator)
    pub column: u32,
    /// Byte offset from the beginning of the buffer
    pub offset: usize,
}

impl Position {
    pub fn new(line: u32, column: u32, offset: usize) -> Self {
        Self { line, column, offset }
    }
}

/// A region of the source buffer (start inclusive, end exclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: Position,
    pub end: Position,
    /// Source file ID in the `SourceCache`
    pub file_id: u32,
}

impl Span {
    pub fn new(start: Position, end: Position, file_id: u32) -> Self {
        Self { start, end, file_id }
    }

    /// The byte range this span covers, for slicing the source buffer
    pub fn range(&self) -> std::ops::Range<usize> {
        self.start.offset..self.end.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_covers_token_bytes() {
        let source = b"let count = 1";
        let span = Span::new(Position::new(1, 4, 4), Position::new(1, 9, 9), 0);
        assert_eq!(span.range(), 4..9);
        assert_eq!(&source[span.range()], b"count");
    }

    #[test]
    fn test_empty_span_at_end_of_input() {
        let end = Position::new(3, 0, 20);
        assert!(Span::new(end, end, 0).range().is_empty());
    }
}
