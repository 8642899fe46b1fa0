/// A contiguous byte range in the source text.
///
/// Spans are half-open: `start` is the offset of the first byte, `len` the
/// number of bytes covered, and [`Span::after_end`] the offset one past the
/// last byte. It's not a `std::ops::Range` as it's handy for a span to be
/// `Copy`.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Span {
    /// the start offset in the source
    pub start: usize,
    /// the number of bytes covered
    pub len: usize,
}

impl Span {
    /// Construct a new span from a start offset and length.
    pub fn new(start: usize, len: usize) -> Self {
        Span { start, len }
    }

    /// The offset one past the last byte of the span.
    pub fn after_end(&self) -> usize {
        self.start + self.len
    }

    /// Turn a span into a range.
    pub fn range(&self) -> std::ops::Range<usize> {
        self.start..self.after_end()
    }
}

impl From<Span> for std::ops::Range<usize> {
    fn from(span: Span) -> Self {
        span.range()
    }
}

impl From<std::ops::Range<usize>> for Span {
    fn from(range: std::ops::Range<usize>) -> Self {
        Span {
            start: range.start,
            len: range.end - range.start,
        }
    }
}
