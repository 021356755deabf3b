use super::{char_slice, Span, Tag, TextRange};

/// One unit of source text with the spans tagged on it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// 1-based position in the store, reassigned on deletion
    pub index: usize,
    /// Row identifier from the dataset
    pub id: i64,
    text: String,
    char_len: usize,
    spans: Vec<Span>,
}

/// A run of page text that renders with a single style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub text: &'a str,
    pub range: TextRange,
    pub tag: Option<Tag>,
}

impl Page {
    /// Create a page. Surrounding whitespace is trimmed once here, so the
    /// stored text is what offsets are computed against.
    pub fn new(index: usize, id: i64, text: &str) -> Self {
        let text = text.trim().to_string();
        let char_len = text.chars().count();
        Self {
            index,
            id,
            text,
            char_len,
            spans: Vec::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length of the text in characters
    pub fn char_len(&self) -> usize {
        self.char_len
    }

    pub fn slice(&self, range: TextRange) -> &str {
        char_slice(&self.text, range)
    }

    /// Spans ordered by start offset
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Span covering the character at `offset`
    pub fn span_at(&self, offset: usize) -> Option<&Span> {
        self.spans.iter().find(|s| s.range.contains(offset))
    }

    pub fn overlapping_span(&self, range: &TextRange) -> Option<&Span> {
        self.spans.iter().find(|s| s.range.overlaps(range))
    }

    pub(crate) fn insert_span(&mut self, span: Span) {
        let pos = self
            .spans
            .partition_point(|s| s.range.start_offset < span.range.start_offset);
        self.spans.insert(pos, span);
    }

    /// Drop every span, returning how many were removed
    pub(crate) fn clear_spans(&mut self) -> usize {
        let removed = self.spans.len();
        self.spans.clear();
        removed
    }

    /// Move the page to a new index, carrying its spans along
    pub(crate) fn renumber(&mut self, index: usize) {
        self.index = index;
        for span in &mut self.spans {
            span.page_index = index;
        }
    }

    /// Project the page into alternating untagged and tagged runs.
    ///
    /// Concatenating the segment texts always yields [`Page::text`].
    pub fn segments(&self) -> Vec<Segment<'_>> {
        let mut segments = Vec::with_capacity(self.spans.len() * 2 + 1);
        let mut cursor = 0;

        for span in &self.spans {
            if span.range.start_offset > cursor {
                let range = TextRange::new(cursor, span.range.start_offset);
                segments.push(Segment {
                    text: self.slice(range),
                    range,
                    tag: None,
                });
            }
            segments.push(Segment {
                text: self.slice(span.range),
                range: span.range,
                tag: Some(span.tag),
            });
            cursor = span.range.end_offset;
        }

        if cursor < self.char_len || segments.is_empty() {
            let range = TextRange::new(cursor, self.char_len);
            segments.push(Segment {
                text: self.slice(range),
                range,
                tag: None,
            });
        }

        segments
    }
}
