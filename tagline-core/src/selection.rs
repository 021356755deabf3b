//! Turning text selections into tagged spans and back.

use tracing::{debug, warn};

use crate::error::{AnnotateError, Result};
use crate::model::{Span, Tag, TextRange};
use crate::session::Session;

impl Session {
    /// Change the tag applied to the next committed selection
    pub fn set_active_tag(&mut self, tag: Option<Tag>) {
        self.active_tag = tag;
        debug!(tag = tag.map(|t| t.name()).unwrap_or(""), "active tag");
    }

    /// Record `range` of the active page as a span under the active tag.
    ///
    /// Returns `Ok(None)` without touching anything when no tag is active or
    /// the range is empty. Ranges running past the page text or intersecting
    /// an existing span are rejected.
    pub fn commit_selection(&mut self, range: TextRange) -> Result<Option<Span>> {
        let Some(tag) = self.active_tag else {
            return Ok(None);
        };
        if range.is_empty() {
            return Ok(None);
        }

        let page = self.store.active_page_mut().ok_or(AnnotateError::NoPages)?;

        if range.end_offset > page.char_len() {
            warn!(?range, len = page.char_len(), "selection outside page");
            return Err(AnnotateError::SelectionOutOfBounds {
                range,
                len: page.char_len(),
            });
        }
        if let Some(existing) = page.overlapping_span(&range) {
            warn!(?range, existing = ?existing.range, "selection overlaps a span");
            return Err(AnnotateError::OverlappingSelection {
                tag: existing.tag.name(),
                text: existing.text.clone(),
            });
        }

        let span = Span::new(page.index, tag, range, page.slice(range).to_string());
        debug!(page = page.index, tag = tag.name(), text = %span.text, "tagged span");
        page.insert_span(span.clone());
        Ok(Some(span))
    }

    /// Remove every span on `page_index`, leaving other pages alone.
    ///
    /// Returns the number of spans removed; an unknown page removes nothing.
    pub fn clear_tag_on_page(&mut self, page_index: usize) -> usize {
        let removed = self
            .store
            .page_mut(page_index)
            .map(|page| page.clear_spans())
            .unwrap_or(0);
        if removed > 0 {
            debug!(page = page_index, removed, "cleared spans");
        }
        removed
    }
}
