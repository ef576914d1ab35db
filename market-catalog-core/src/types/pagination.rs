//! Pagination types for the catalog listing

use serde::{Deserialize, Serialize};

use super::market_app::{AppMode, MarketApp};

/// Default number of entries per page
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Largest page the catalog backend serves
pub const MAX_PAGE_SIZE: u32 = 100;

/// One list request as sent to the catalog API.
///
/// Pages are 1-indexed. `search` and `mode` are omitted entirely when not filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    pub page: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<AppMode>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            search: None,
            mode: None,
        }
    }
}

impl ListQuery {
    /// Clamp pagination values to valid ranges.
    ///
    /// - `page` is clamped to `>= 1`
    /// - `limit` is clamped to `1..=max_page_size`
    #[must_use]
    pub fn validated(&self, max_page_size: u32) -> Self {
        Self {
            page: self.page.max(1),
            limit: self.limit.clamp(1, max_page_size),
            search: self.search.clone(),
            mode: self.mode,
        }
    }

    /// Query-string pairs in the order the backend documents them
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
        ];
        if let Some(ref search) = self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(mode) = self.mode {
            pairs.push(("mode", mode.as_str().to_string()));
        }
        pairs
    }
}

/// One page answered by the catalog API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketAppPage {
    #[serde(rename = "data")]
    pub items: Vec<MarketApp>,
    pub has_more: bool,
}

impl MarketAppPage {
    #[must_use]
    pub fn new(items: Vec<MarketApp>, has_more: bool) -> Self {
        Self { items, has_more }
    }
}

/// A page held by the list, keyed by its 0-based index
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub index: usize,
    pub items: Vec<MarketApp>,
    pub has_more: bool,
}

impl Page {
    #[must_use]
    pub fn from_response(index: usize, page: MarketAppPage) -> Self {
        Self {
            index,
            items: page.items,
            has_more: page.has_more,
        }
    }
}
