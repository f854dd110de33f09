//! Offset+length views into a backing string.
//!
//! The markup scanner works on byte offsets into an immutable input string.
//! [`SubstringRange`] keeps those offsets honest: every derived slice is
//! bounds- and char-boundary-checked against the backing string it was
//! produced from, and ranges are never stored beyond the scan that made them.

/// A byte-offset view into a backing string.
///
/// A range is only meaningful together with the string it was derived from;
/// [`substr`](SubstringRange::substr) re-validates against whatever backing
/// string the caller supplies and returns `None` on any mismatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubstringRange {
    offset: usize,
    len: usize,
}

impl SubstringRange {
    /// Creates a range covering `len` bytes starting at `offset`.
    pub fn new(offset: usize, len: usize) -> Self {
        Self { offset, len }
    }

    /// The byte offset where the range starts.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The length of the range in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the range covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The byte offset one past the end of the range.
    pub fn end(&self) -> usize {
        self.offset + self.len
    }

    /// Resolves the range against a backing string.
    ///
    /// Returns `None` when the range falls outside the string or does not
    /// land on UTF-8 character boundaries.
    pub fn substr<'a>(&self, backing: &'a str) -> Option<&'a str> {
        backing.get(self.offset..self.end())
    }

    /// Returns true if the range resolves to exactly `needle`.
    pub fn matches(&self, backing: &str, needle: &str) -> bool {
        self.substr(backing) == Some(needle)
    }
}
