//! Byte-offset spans into grammar source text.

use std::ops::Range;

/// A half-open byte range in a source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    start: usize,
    end: usize,
}

impl Span {
    /// Create a new span from a byte range.
    pub fn new(range: Range<usize>) -> Self {
        Self {
            start: range.start,
            end: range.end.max(range.start),
        }
    }

    /// Get the start offset of the span
    pub fn start(&self) -> usize {
        self.start
    }

    /// Get the end offset of the span
    pub fn end(&self) -> usize {
        self.end
    }

    /// Get the length of the span
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if the span is empty
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Span of `line`/`column` (both 1-based) in `source`, one character wide.
    ///
    /// Positions past the end of the text clamp to its end.
    pub fn at_line_column(source: &str, line: usize, column: usize) -> Self {
        let line_start: usize = source
            .split_inclusive('\n')
            .take(line.saturating_sub(1))
            .map(str::len)
            .sum();
        let start = (line_start + column.saturating_sub(1)).min(source.len());
        let end = source[start..]
            .chars()
            .next()
            .map_or(start, |c| start + c.len_utf8());
        Self::new(start..end)
    }

    /// Span of the first object key `"key"` in a JSON `source`, quotes included.
    ///
    /// Best effort: JSON values carry no positions once parsed, so the key is
    /// searched textually and the first occurrence followed by a colon wins.
    pub fn of_json_key(source: &str, key: &str) -> Option<Self> {
        let quoted = format!("\"{key}\"");
        source.match_indices(&quoted).find_map(|(start, matched)| {
            let end = start + matched.len();
            source[end..]
                .trim_start()
                .starts_with(':')
                .then(|| Self::new(start..end))
        })
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self::new(range)
    }
}
