//! Next-page decision

use crate::types::{FilterState, ListQuery, Page, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Decides which page to fetch next for a filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationCursor {
    page_size: u32,
}

impl Default for PaginationCursor {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl PaginationCursor {
    /// `page_size` is clamped to `1..=MAX_PAGE_SIZE`
    #[must_use]
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Request for the page at `page_index` (0-based), or `None` to stop.
    ///
    /// Index 0 always yields a request. Later indices need the previous page and
    /// its `has_more`.
    #[must_use]
    pub fn next_request(
        &self,
        page_index: usize,
        previous: Option<&Page>,
        filter: &FilterState,
    ) -> Option<ListQuery> {
        if page_index > 0 && !previous.is_some_and(|p| p.has_more) {
            return None;
        }
        let page = u32::try_from(page_index + 1).ok()?;
        Some(ListQuery {
            page,
            limit: self.page_size,
            search: filter.query_text(),
            mode: filter.category.mode(),
        })
    }
}
