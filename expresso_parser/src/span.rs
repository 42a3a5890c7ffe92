//! Source locations for tokens, AST nodes and errors.

use serde::{Deserialize, Serialize};

/// A region of the expression source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    /// First byte of the region
    pub start: usize,
    /// One past the last byte
    pub end: usize,
    // Lines and columns count from 1; columns are byte based.
    pub start_line: usize,
    pub end_line: usize,
    pub start_column: usize,
    pub end_column: usize,
}

impl Span {
    /// Create a new span
    pub fn new(
        start: usize,
        end: usize,
        start_line: usize,
        end_line: usize,
        start_column: usize,
        end_column: usize,
    ) -> Self {
        Self {
            start,
            end,
            start_line,
            end_line,
            start_column,
            end_column,
        }
    }

    /// Create a span from byte offsets only. Line and column stay zero.
    pub fn from_offsets(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            ..Self::default()
        }
    }

    /// Smallest span covering both `self` and `other`
    pub fn merge(&self, other: &Span) -> Span {
        let (first, last) = (
            if self.start <= other.start { self } else { other },
            if self.end >= other.end { self } else { other },
        );
        Span {
            start: first.start,
            end: last.end,
            start_line: first.start_line,
            end_line: last.end_line,
            start_column: first.start_column,
            end_column: last.end_column,
        }
    }

    /// Length of the span in bytes
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Whether `offset` falls inside the half-open range
    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }

    /// Check if `other` lies entirely inside this span
    pub fn contains_span(&self, other: &Span) -> bool {
        other.start >= self.start && other.end <= self.end
    }
}

/// Line start table used to turn byte offsets into line/column pairs
#[derive(Debug, Clone)]
pub struct SourceMap {
    line_starts: Vec<usize>,
}

impl SourceMap {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(memchr::memchr_iter(b'\n', source.as_bytes()).map(|i| i + 1));
        Self { line_starts }
    }

    /// 1-based `(line, column)` of a byte offset
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(line) => line.saturating_sub(1),
        };
        let line_start = self.line_starts.get(line).copied().unwrap_or(0);
        (line + 1, offset - line_start + 1)
    }

    /// Span for `start..end` with positions filled in
    pub fn span(&self, start: usize, end: usize) -> Span {
        let (start_line, start_column) = self.line_col(start);
        let (end_line, end_column) = self.line_col(end);
        Span {
            start,
            end,
            start_line,
            end_line,
            start_column,
            end_column,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_map() {
        let map = SourceMap::new("a +\n  b\n");

        assert_eq!(map.line_col(0), (1, 1));
        assert_eq!(map.line_col(3), (1, 4)); // '\n'
        assert_eq!(map.line_col(4), (2, 1));
        assert_eq!(map.line_col(6), (2, 3)); // 'b'
    }

    #[test]
    fn test_span_merge_keeps_outer_bounds() {
        let left = Span::new(0, 5, 1, 1, 1, 6);
        let right = Span::new(10, 15, 2, 2, 5, 10);
        let merged = right.merge(&left);

        assert_eq!(merged.start, 0);
        assert_eq!(merged.end, 15);
        assert_eq!(merged.start_column, 1);
        assert_eq!(merged.end_column, 10);
        assert!(merged.contains_span(&left));
        assert!(merged.contains_span(&right));
    }

    #[test]
    fn test_contains() {
        let span = Span::from_offsets(2, 4);
        assert!(!span.contains(1));
        assert!(span.contains(2));
        assert!(!span.contains(4));
        assert_eq!(span.len(), 2);
    }
}
