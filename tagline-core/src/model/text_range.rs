use serde::{Deserialize, Serialize};

/// Half-open range of text by character offsets
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct TextRange {
    pub start_offset: usize,
    pub end_offset: usize,
}

impl TextRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start_offset: start.min(end),
            end_offset: start.max(end),
        }
    }

    pub fn len(&self) -> usize {
        self.end_offset - self.start_offset
    }

    pub fn is_empty(&self) -> bool {
        self.start_offset == self.end_offset
    }

    /// Check if this range contains the given offset
    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start_offset && offset < self.end_offset
    }

    /// True when the two ranges share at least one character
    pub fn overlaps(&self, other: &TextRange) -> bool {
        self.start_offset < other.end_offset && other.start_offset < self.end_offset
    }
}

/// Slice `text` by character offsets. Offsets past the end are clamped.
pub fn char_slice(text: &str, range: TextRange) -> &str {
    let start = byte_offset(text, range.start_offset);
    let end = byte_offset(text, range.end_offset);
    &text[start..end]
}

fn byte_offset(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}
