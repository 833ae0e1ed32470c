//! Source location tracking
//!
//! Tokens only carry byte offsets and a line number. The types here turn
//! those into line/column positions for log events and caret diagnostics.
use serde::{Deserialize, Serialize};
use std::fmt;

/// A position in source text with line, column, and byte offset.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Position {
    /// Byte offset from start of input (0-based)
    pub offset: usize,
    /// Line number (1-based)
    pub line: u32,
    /// Column number (1-based)
    pub column: u32,
}

impl Position {
    pub fn new(offset: usize, line: u32, column: u32) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A span of source text from start (inclusive) to end (exclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        debug_assert!(
            start.offset <= end.offset,
            "Span start must not be after end"
        );
        Self { start, end }
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn end(&self) -> Position {
        self.end
    }

    /// Span covering a single line without column information
    pub fn line_only(line: u32) -> Self {
        let pos = Position::new(0, line, 1);
        Self {
            start: pos,
            end: pos,
        }
    }

    pub fn len(&self) -> usize {
        self.end.offset - self.start.offset
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn slice<'a>(&self, input: &'a str) -> &'a str {
        input
            .get(self.start.offset..self.end.offset)
            .unwrap_or_default()
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start.line == self.end.line {
            write!(
                f,
                "{}:{}-{}",
                self.start.line, self.start.column, self.end.column
            )
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Line index over a source text for offset-to-position lookup
#[derive(Debug, Clone)]
pub struct SourceMap {
    pub source: String,
    /// Byte offsets of line starts
    line_starts: Vec<usize>,
}

impl SourceMap {
    pub fn new(source: String) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(offset, _)| offset + 1),
        );
        Self {
            source,
            line_starts,
        }
    }

    pub fn position_at(&self, offset: usize) -> Position {
        let offset = offset.min(self.source.len());
        let line = self
            .line_starts
            .binary_search(&offset)
            .unwrap_or_else(|i| i - 1);

        let line_start = self.line_starts[line];
        let column = self
            .source
            .get(line_start..offset)
            .map(|text| text.chars().count())
            .unwrap_or(offset - line_start);

        Position::new(offset, (line + 1) as u32, (column + 1) as u32)
    }

    pub fn span(&self, start: usize, end: usize) -> Span {
        Span::new(self.position_at(start), self.position_at(end.max(start)))
    }

    /// Line text without its terminator (1-based)
    pub fn get_line(&self, line_num: u32) -> Option<&str> {
        let line_idx = (line_num as usize).checked_sub(1)?;
        let start = *self.line_starts.get(line_idx)?;
        let end = self
            .line_starts
            .get(line_idx + 1)
            .map(|next| next - 1)
            .unwrap_or(self.source.len());

        self.source
            .get(start..end)
            .map(|line| line.trim_end_matches('\r'))
    }

    /// Span of a line's text with its indentation left out (1-based)
    pub fn line_span(&self, line_num: u32) -> Option<Span> {
        let text = self.get_line(line_num)?;
        let start = self.line_starts[line_num as usize - 1];
        let indent = text.len() - text.trim_start().len();
        Some(self.span(start + indent, start + text.trim_end().len()))
    }

    /// Render a message with the offending line and a caret underline
    pub fn format_error(&self, span: &Span, message: &str) -> String {
        let mut result = format!("error: {}\n  --> {}\n", message, span.start);

        if let Some(line) = self.get_line(span.start.line) {
            let gutter = span.start.line.to_string();
            let padding = " ".repeat(gutter.len());
            let carets = if span.start.line == span.end.line {
                (span.end.column.saturating_sub(span.start.column)) as usize
            } else {
                line.chars().count() + 1 - span.start.column as usize
            };

            result.push_str(&format!("{} |\n", padding));
            result.push_str(&format!("{} | {}\n", gutter, line));
            result.push_str(&format!(
                "{} | {}{}\n",
                padding,
                " ".repeat(span.start.column.saturating_sub(1) as usize),
                "^".repeat(carets.max(1))
            ));
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_lookup() {
        let map = SourceMap::new("int x = 1;\nwhile (x < 3):\n".to_string());

        assert_eq!(map.position_at(0), Position::new(0, 1, 1));
        assert_eq!(map.position_at(11), Position::new(11, 2, 1));
        assert_eq!(map.position_at(18), Position::new(18, 2, 8));
    }

    #[test]
    fn test_get_line() {
        let map = SourceMap::new("a = 1\r\nb = 2\n".to_string());

        assert_eq!(map.get_line(1), Some("a = 1"));
        assert_eq!(map.get_line(2), Some("b = 2"));
        assert_eq!(map.get_line(0), None);
        assert_eq!(map.get_line(9), None);
    }

    #[test]
    fn test_format_error_underlines_span() {
        let map = SourceMap::new("x = $;\n".to_string());
        let span = map.span(4, 5);
        let rendered = map.format_error(&span, "unexpected character '$'");

        assert!(rendered.contains("--> 1:5"));
        assert!(rendered.contains("1 | x = $;"));
        assert!(rendered.contains("|     ^\n"));
    }

    #[test]
    fn test_line_span_skips_indentation() {
        let map = SourceMap::new("if a:\n    b = 1\n".to_string());
        let span = map.line_span(2).unwrap();

        assert_eq!(span.start, Position::new(10, 2, 5));
        assert_eq!(span.end, Position::new(15, 2, 10));
        assert!(map.line_span(5).is_none());
    }

    #[test]
    fn test_span_slice() {
        let source = "print(x)";
        let map = SourceMap::new(source.to_string());
        assert_eq!(map.span(0, 5).slice(source), "print");
        assert_eq!(map.span(0, 5).len(), 5);
    }
}
