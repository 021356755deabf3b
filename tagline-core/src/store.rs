//! Ordered page collection with navigation and renumbering deletion.

use tracing::{debug, warn};

use crate::error::{AnnotateError, Result};
use crate::model::Page;

/// Active/total ratio shown by the progress indicator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    pub active: usize,
    pub total: usize,
}

impl Progress {
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.active as f64 / self.total as f64
        }
    }

    pub fn percent(&self) -> u16 {
        (self.ratio() * 100.0).round() as u16
    }
}

#[derive(Debug, Clone, Default)]
pub struct PageStore {
    pages: Vec<Page>,
    /// 1-based; 0 only while the store is empty
    active: usize,
}

impl PageStore {
    /// Build a store from `(id, text)` rows. Pages are numbered in order.
    pub fn from_rows<I, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = (i64, S)>,
        S: AsRef<str>,
    {
        let pages: Vec<Page> = rows
            .into_iter()
            .enumerate()
            .map(|(i, (id, text))| Page::new(i + 1, id, text.as_ref()))
            .collect();
        let active = if pages.is_empty() { 0 } else { 1 };
        Self { pages, active }
    }

    /// Build a store from bare texts, using the position as the page id
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_rows(
            texts
                .into_iter()
                .enumerate()
                .map(|(i, text)| ((i + 1) as i64, text)),
        )
    }

    pub fn total_pages(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_page(&self) -> Option<&Page> {
        self.page(self.active)
    }

    pub(crate) fn active_page_mut(&mut self) -> Option<&mut Page> {
        self.page_mut(self.active)
    }

    pub fn page(&self, index: usize) -> Option<&Page> {
        index.checked_sub(1).and_then(|i| self.pages.get(i))
    }

    pub(crate) fn page_mut(&mut self, index: usize) -> Option<&mut Page> {
        index.checked_sub(1).and_then(|i| self.pages.get_mut(i))
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn progress(&self) -> Progress {
        Progress {
            active: self.active,
            total: self.pages.len(),
        }
    }

    pub fn span_count(&self) -> usize {
        self.pages.iter().map(|p| p.spans().len()).sum()
    }

    /// Make page `n` active
    pub fn go_to(&mut self, n: usize) -> Result<()> {
        let total = self.pages.len();
        if n < 1 || n > total {
            warn!(requested = n, total, "page jump out of range");
            return Err(AnnotateError::PageOutOfRange {
                requested: n,
                total,
            });
        }
        self.active = n;
        debug!(active = n, total, "moved to page");
        Ok(())
    }

    /// Advance one page; stays put on the last page
    pub fn next(&mut self) {
        if self.active < self.pages.len() {
            self.active += 1;
            debug!(active = self.active, "next page");
        }
    }

    /// Go back one page; stays put on the first page
    pub fn previous(&mut self) {
        if self.active > 1 {
            self.active -= 1;
            debug!(active = self.active, "previous page");
        }
    }

    /// Delete page `n` (the active page when `None`) together with its spans.
    ///
    /// Later pages shift down by one. The active page keeps pointing at the
    /// same content when an earlier page is removed, and is clamped to the
    /// new total when it pointed past the end.
    pub fn delete(&mut self, n: Option<usize>) -> Result<Page> {
        let total = self.pages.len();
        if total == 0 {
            return Err(AnnotateError::NoPages);
        }
        let n = n.unwrap_or(self.active);
        if n < 1 || n > total {
            return Err(AnnotateError::PageOutOfRange {
                requested: n,
                total,
            });
        }
        if total == 1 {
            warn!("refusing to delete the last page");
            return Err(AnnotateError::LastPage);
        }

        let removed = self.pages.remove(n - 1);
        for (i, page) in self.pages.iter_mut().enumerate().skip(n - 1) {
            page.renumber(i + 1);
        }

        if self.active > n {
            self.active -= 1;
        }
        self.active = self.active.min(self.pages.len());

        debug!(
            deleted = n,
            spans = removed.spans().len(),
            total = self.pages.len(),
            active = self.active,
            "deleted page"
        );
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn store(n: usize) -> PageStore {
        PageStore::from_texts((1..=n).map(|i| format!("page {}", i)))
    }

    fn indices(store: &PageStore) -> Vec<usize> {
        store.pages().iter().map(|p| p.index).collect()
    }

    #[test]
    fn test_from_texts_numbers_pages() {
        let store = store(3);
        assert_eq!(indices(&store), vec![1, 2, 3]);
        assert_eq!(store.active_index(), 1);
        assert_eq!(store.page(2).map(|p| p.id), Some(2));
        assert!(store.page(0).is_none());
        assert!(store.page(4).is_none());
    }

    #[test]
    fn test_go_to_out_of_range_is_rejected() {
        let mut store = store(3);
        store.go_to(2).unwrap();

        for n in [0, 4, 100] {
            let err = store.go_to(n).unwrap_err();
            assert_eq!(
                err,
                AnnotateError::PageOutOfRange {
                    requested: n,
                    total: 3
                }
            );
            assert_eq!(store.active_index(), 2);
        }
    }

    #[test]
    fn test_next_previous_clamp() {
        let mut store = store(2);
        store.previous();
        assert_eq!(store.active_index(), 1);
        store.next();
        store.next();
        assert_eq!(store.active_index(), 2);
    }

    #[test]
    fn test_progress() {
        let mut store = store(4);
        store.go_to(2).unwrap();
        let progress = store.progress();
        assert_eq!(progress.active, 2);
        assert_eq!(progress.total, 4);
        assert_eq!(progress.percent(), 50);
        assert_eq!(PageStore::default().progress().ratio(), 0.0);
    }

    #[test]
    fn test_delete_last_remaining_page() {
        let mut store = store(1);
        assert_eq!(store.delete(None).unwrap_err(), AnnotateError::LastPage);
        assert_eq!(store.total_pages(), 1);
        assert_eq!(store.active_page().map(|p| p.text()), Some("page 1"));
    }

    #[test]
    fn test_delete_active_last_page_clamps() {
        let mut store = store(3);
        store.go_to(3).unwrap();
        let removed = store.delete(None).unwrap();
        assert_eq!(removed.text(), "page 3");
        assert_eq!(store.active_index(), 2);
        assert_eq!(indices(&store), vec![1, 2]);
    }

    #[test]
    fn test_delete_earlier_page_keeps_active_content() {
        let mut store = store(4);
        store.go_to(3).unwrap();
        store.delete(Some(1)).unwrap();
        assert_eq!(store.active_index(), 2);
        assert_eq!(store.active_page().map(|p| p.text()), Some("page 3"));
        assert_eq!(indices(&store), vec![1, 2, 3]);
    }

    #[test]
    fn test_delete_out_of_range() {
        let mut store = store(2);
        assert!(matches!(
            store.delete(Some(5)),
            Err(AnnotateError::PageOutOfRange { .. })
        ));
        assert_eq!(store.total_pages(), 2);
        assert_eq!(PageStore::default().delete(None).unwrap_err(), AnnotateError::NoPages);
    }
}
