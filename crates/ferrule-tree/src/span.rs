//! Source positions

/// A region of the original source file.
///
/// Spans survive every rewrite so that later diagnostics can point back at
/// the construct a synthesized statement came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
    /// 1-based line number
    pub line: u32,
    /// 1-based column number
    pub column: u32,
}

impl Span {
    /// Create a span from offsets and a line/column pair.
    pub fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    /// Span for nodes that have no source counterpart.
    pub fn synthetic() -> Self {
        Self::default()
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// True for zero-width spans (including synthetic ones).
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Smallest span covering both `self` and `other`.
    pub fn merge(&self, other: &Span) -> Span {
        let (line, column) = if self.start <= other.start {
            (self.line, self.column)
        } else {
            (other.line, other.column)
        };
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
            line,
            column,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_earliest_position() {
        let a = Span::new(10, 14, 2, 3);
        let b = Span::new(2, 6, 1, 3);
        let merged = a.merge(&b);
        assert_eq!(merged.start, 2);
        assert_eq!(merged.end, 14);
        assert_eq!(merged.line, 1);
    }

    #[test]
    fn test_synthetic_span_is_empty() {
        assert!(Span::synthetic().is_empty());
        assert_eq!(Span::new(3, 8, 1, 4).len(), 5);
    }
}
