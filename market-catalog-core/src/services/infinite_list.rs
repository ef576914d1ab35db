//! Infinite list controller
//!
//! Holds the pages fetched for the active filter and decides when to fetch more.
//! The state lock is never held across a call to the catalog API, so a filter change
//! can land while a fetch is pending; the generation counter makes the late
//! response a no-op.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::RwLock;

use super::pagination_cursor::PaginationCursor;
use super::refresh_signal::CrossViewRefreshSignal;
use crate::config::CatalogConfig;
use crate::error::{CoreError, CoreResult};
use crate::traits::{ListRefresh, MarketAppApi};
use crate::types::{Category, FilterState, ListQuery, MarketApp, MarketAppPage, Page};

/// Result of a fetch attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// No request was issued (in flight, exhausted, trigger disarmed or out of range)
    Skipped,
    /// A new page was appended
    Appended,
    /// Page 0 was replaced in place
    Replaced,
    /// A fetch was pending; the refresh runs once it completes
    Queued,
    /// The response answered an older filter and was dropped
    Stale,
    /// The request failed; the pages are unchanged
    Failed,
}

/// Read-only view for presentation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSnapshot {
    pub filter: FilterState,
    pub items: Vec<MarketApp>,
    pub total_count: usize,
    pub is_empty: bool,
    pub is_loading: bool,
    pub has_more: bool,
    pub trigger_armed: bool,
    pub last_error: Option<CoreError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchKind {
    Append,
    RefreshFirst,
}

/// A request taken out of the state, answered later
#[derive(Debug)]
struct FetchTicket {
    generation: u64,
    page_index: usize,
    kind: FetchKind,
    query: ListQuery,
}

#[derive(Debug, Default)]
struct ListState {
    filter: FilterState,
    generation: u64,
    pages: Vec<Page>,
    /// An append fetch is pending
    in_flight: bool,
    /// A page-0 refresh is pending
    refreshing: bool,
    /// A refresh was requested while another fetch was pending
    refresh_pending: bool,
    trigger_armed: bool,
    last_error: Option<CoreError>,
}

impl ListState {
    fn new() -> Self {
        Self {
            trigger_armed: true,
            ..Default::default()
        }
    }

    /// Replace the filter and drop every page
    fn reset(&mut self, filter: FilterState) {
        self.filter = filter;
        self.generation += 1;
        self.pages.clear();
        self.in_flight = false;
        self.refreshing = false;
        self.refresh_pending = false;
        self.trigger_armed = true;
        self.last_error = None;
    }

    fn begin_append(&mut self, cursor: &PaginationCursor) -> Option<FetchTicket> {
        if self.in_flight || self.refreshing {
            return None;
        }
        let page_index = self.pages.len();
        let query = cursor.next_request(page_index, self.pages.last(), &self.filter)?;
        self.in_flight = true;
        Some(FetchTicket {
            generation: self.generation,
            page_index,
            kind: FetchKind::Append,
            query,
        })
    }

    /// Take a page-0 ticket, or mark the refresh pending while another fetch runs
    fn begin_refresh(&mut self, cursor: &PaginationCursor) -> Option<FetchTicket> {
        if self.refreshing || self.in_flight {
            self.refresh_pending = true;
            return None;
        }
        self.refresh_pending = false;
        if self.pages.is_empty() {
            return self.begin_append(cursor);
        }
        let query = cursor.next_request(0, None, &self.filter)?;
        self.refreshing = true;
        Some(FetchTicket {
            generation: self.generation,
            page_index: 0,
            kind: FetchKind::RefreshFirst,
            query,
        })
    }

    fn take_pending_refresh(&mut self, cursor: &PaginationCursor) -> Option<FetchTicket> {
        if !self.refresh_pending {
            return None;
        }
        self.begin_refresh(cursor)
    }

    fn complete(&mut self, ticket: &FetchTicket, result: CoreResult<MarketAppPage>) -> LoadOutcome {
        // A reset already cleared the flags for the new generation
        if ticket.generation != self.generation {
            return LoadOutcome::Stale;
        }
        match ticket.kind {
            FetchKind::Append => self.in_flight = false,
            FetchKind::RefreshFirst => self.refreshing = false,
        }

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                self.last_error = Some(e);
                return LoadOutcome::Failed;
            }
        };
        self.last_error = None;

        let outcome = match ticket.kind {
            FetchKind::Append => {
                if ticket.page_index != self.pages.len() {
                    return LoadOutcome::Stale;
                }
                self.pages
                    .push(Page::from_response(ticket.page_index, response));
                LoadOutcome::Appended
            }
            FetchKind::RefreshFirst => {
                let page = Page::from_response(0, response);
                match self.pages.first_mut() {
                    Some(first) => *first = page,
                    None => self.pages.push(page),
                }
                LoadOutcome::Replaced
            }
        };
        self.trigger_armed = self.has_more();
        outcome
    }

    fn remove_item(&mut self, id: &str) -> bool {
        let mut removed = false;
        for page in &mut self.pages {
            let before = page.items.len();
            page.items.retain(|app| app.id != id);
            removed |= page.items.len() != before;
        }
        removed
    }

    /// Flat item sequence, deduplicated by ID (first occurrence wins)
    fn items(&self) -> Vec<MarketApp> {
        let mut seen = HashSet::new();
        self.pages
            .iter()
            .flat_map(|p| p.items.iter())
            .filter(|app| seen.insert(app.id.as_str()))
            .cloned()
            .collect()
    }

    /// Unknown until the first page resolves
    fn has_more(&self) -> bool {
        self.pages.last().is_none_or(|p| p.has_more)
    }

    fn is_empty(&self) -> bool {
        !self.pages.is_empty() && self.pages.iter().all(|p| p.items.is_empty())
    }

    fn is_loading(&self) -> bool {
        self.in_flight || self.refreshing
    }
}

/// Infinite list controller
pub struct InfiniteListController {
    api: Arc<dyn MarketAppApi>,
    cursor: PaginationCursor,
    scroll_threshold_px: u32,
    signal: Option<Arc<CrossViewRefreshSignal>>,
    state: RwLock<ListState>,
}

impl InfiniteListController {
    /// Create a controller with the default filter; nothing is fetched until
    /// [`Self::request_more`] (or a filter change) is called.
    #[must_use]
    pub fn new(api: Arc<dyn MarketAppApi>, config: &CatalogConfig) -> Self {
        Self {
            api,
            cursor: PaginationCursor::new(config.page_size),
            scroll_threshold_px: config.scroll_threshold_px,
            signal: None,
            state: RwLock::new(ListState::new()),
        }
    }

    /// Attach the cross-view signal polled by [`Self::poll_cross_view_signal`]
    #[must_use]
    pub fn with_refresh_signal(mut self, signal: Arc<CrossViewRefreshSignal>) -> Self {
        self.signal = Some(signal);
        self
    }

    /// Replace the filter and restart from the first page.
    ///
    /// An identical filter is a no-op once loading has started.
    pub async fn set_filter(&self, category: Category, search_text: &str) -> LoadOutcome {
        let filter = FilterState::new(category, search_text);
        {
            let mut state = self.state.write().await;
            let started = state.is_loading() || !state.pages.is_empty();
            if state.filter == filter && started {
                return LoadOutcome::Skipped;
            }
            log::debug!(
                "Market list filter -> category={}, search='{}'",
                filter.category,
                filter.search_text
            );
            state.reset(filter);
        }
        self.request_more().await
    }

    /// Fetch the next page if nothing is in flight and the last page has more.
    ///
    /// Loads the first page when no page is held yet.
    pub async fn request_more(&self) -> LoadOutcome {
        let ticket = self.state.write().await.begin_append(&self.cursor);
        match ticket {
            Some(ticket) => self.run(ticket).await,
            None => LoadOutcome::Skipped,
        }
    }

    /// Scroll-proximity callback; `distance_px` is the sentinel's distance from the viewport
    pub async fn scroll_proximity_trigger(&self, distance_px: u32) -> LoadOutcome {
        if distance_px > self.scroll_threshold_px {
            return LoadOutcome::Skipped;
        }
        if !self.state.read().await.trigger_armed {
            return LoadOutcome::Skipped;
        }
        self.request_more().await
    }

    /// Re-fetch page 0 and replace it in place, keeping later pages.
    ///
    /// While another fetch is pending the refresh is queued and issued by that
    /// fetch once it completes.
    pub async fn refresh(&self) -> LoadOutcome {
        let (ticket, queued) = {
            let mut state = self.state.write().await;
            let ticket = state.begin_refresh(&self.cursor);
            (ticket, state.refresh_pending)
        };
        match ticket {
            Some(ticket) => self.run(ticket).await,
            None if queued => LoadOutcome::Queued,
            None => LoadOutcome::Skipped,
        }
    }

    /// Drop an entry the server confirmed as deleted
    pub async fn remove_item(&self, id: &str) -> bool {
        self.state.write().await.remove_item(id)
    }

    /// Refresh page 0 when another instance published a newer marker
    pub async fn poll_cross_view_signal(&self) -> bool {
        let Some(ref signal) = self.signal else {
            return false;
        };
        if !signal.poll().await {
            return false;
        }
        self.refresh().await;
        true
    }

    /// Answer `ticket`, then any refresh queued meanwhile.
    ///
    /// Returns the outcome of the first ticket.
    async fn run(&self, mut ticket: FetchTicket) -> LoadOutcome {
        let mut first_outcome = None;
        loop {
            log::debug!(
                "Fetching market apps page={} (generation {})",
                ticket.query.page,
                ticket.generation
            );
            let result = self.api.list_apps(&ticket.query).await;
            if let Err(ref e) = result {
                e.log("Failed to load market apps");
            }

            let (outcome, pending) = {
                let mut state = self.state.write().await;
                let outcome = state.complete(&ticket, result);
                (outcome, state.take_pending_refresh(&self.cursor))
            };
            if outcome == LoadOutcome::Stale {
                log::debug!(
                    "Dropped stale market apps page={} (generation {})",
                    ticket.query.page,
                    ticket.generation
                );
            }
            let first = *first_outcome.get_or_insert(outcome);
            match pending {
                Some(next) => ticket = next,
                None => return first,
            }
        }
    }

    // ===== derived state =====

    pub async fn items(&self) -> Vec<MarketApp> {
        self.state.read().await.items()
    }

    pub async fn total_count(&self) -> usize {
        self.state.read().await.items().len()
    }

    /// First page resolved and nothing to show
    pub async fn is_empty(&self) -> bool {
        self.state.read().await.is_empty()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.is_loading()
    }

    pub async fn has_more(&self) -> bool {
        self.state.read().await.has_more()
    }

    pub async fn is_trigger_armed(&self) -> bool {
        self.state.read().await.trigger_armed
    }

    pub async fn filter(&self) -> FilterState {
        self.state.read().await.filter.clone()
    }

    /// Number of pages held
    pub async fn page_count(&self) -> usize {
        self.state.read().await.pages.len()
    }

    /// Most recent list-fetch failure, cleared by the next successful fetch
    pub async fn last_error(&self) -> Option<CoreError> {
        self.state.read().await.last_error.clone()
    }

    pub async fn snapshot(&self) -> ListSnapshot {
        let state = self.state.read().await;
        let items = state.items();
        ListSnapshot {
            filter: state.filter.clone(),
            total_count: items.len(),
            items,
            is_empty: state.is_empty(),
            is_loading: state.is_loading(),
            has_more: state.has_more(),
            trigger_armed: state.trigger_armed,
            last_error: state.last_error.clone(),
        }
    }
}

#[async_trait]
impl ListRefresh for InfiniteListController {
    async fn refresh(&self) {
        InfiniteListController::refresh(self).await;
    }

    async fn remove_item(&self, id: &str) {
        InfiniteListController::remove_item(self, id).await;
    }
}
