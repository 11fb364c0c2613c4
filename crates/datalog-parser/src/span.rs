use crate::SrcId;
use std::{fmt, ops::Range};

/// Character range in the original source text
///
/// Offsets count characters, not bytes, and refer to the text as written:
/// comment stripping and newline removal never shift them.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Span {
    src: SrcId,
    start: usize,
    end: usize,
}

impl Span {
    /// Panics if `range` runs backwards
    pub fn new(src: SrcId, range: Range<usize>) -> Self {
        assert!(
            range.start <= range.end,
            "span {}..{} runs backwards",
            range.start,
            range.end
        );
        Span {
            src,
            start: range.start,
            end: range.end,
        }
    }

    /// Zero-width span at `offset`, used for end of input
    pub fn point(src: SrcId, offset: usize) -> Self {
        Span::new(src, offset..offset)
    }

    pub fn src(&self) -> SrcId {
        self.src
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Number of characters covered
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Smallest span covering both; they must come from the same source
    pub fn union(self, other: Self) -> Self {
        assert_eq!(self.src, other.src, "span source ids must match");
        Span::new(
            self.src,
            self.start.min(other.start)..self.end.max(other.end),
        )
    }

    /// The characters of `text` this span covers
    pub fn slice(&self, text: &str) -> String {
        text.chars().skip(self.start).take(self.len()).collect()
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}..{}", self.src, self.start, self.end)
    }
}

impl chumsky::Span for Span {
    type Context = SrcId;
    type Offset = usize;

    fn new(src: SrcId, range: Range<usize>) -> Self {
        Span::new(src, range)
    }

    fn context(&self) -> SrcId {
        self.src
    }

    fn start(&self) -> usize {
        self.start
    }

    fn end(&self) -> usize {
        self.end
    }
}

impl ariadne::Span for Span {
    type SourceId = SrcId;

    fn source(&self) -> &SrcId {
        &self.src
    }

    fn start(&self) -> usize {
        self.start
    }

    fn end(&self) -> usize {
        self.end
    }
}
