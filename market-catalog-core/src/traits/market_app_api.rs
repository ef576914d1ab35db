//! Catalog API abstract Trait

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::{
    CloneOutcome, CreateMarketAppRequest, ListQuery, MarketApp, MarketAppPage,
    UpdateMarketAppRequest,
};

/// Catalog API Trait
///
/// Platform implementation:
/// - HTTP: `HttpMarketAppApi` (market-catalog-app, reqwest)
/// - In-memory: `InMemoryMarketAppApi` (reference server semantics)
#[async_trait]
pub trait MarketAppApi: Send + Sync {
    /// List one page of the catalog
    ///
    /// # Arguments
    /// * `query` - page, limit and optional search/mode filters
    async fn list_apps(&self, query: &ListQuery) -> CoreResult<MarketAppPage>;

    /// Publish a workspace app to the catalog
    ///
    /// The server assigns id, creator and timestamps.
    async fn create_app(&self, request: &CreateMarketAppRequest) -> CoreResult<MarketApp>;

    /// Update an existing entry
    ///
    /// # Arguments
    /// * `id` - Entry ID
    /// * `request` - fields to change
    async fn update_app(&self, id: &str, request: &UpdateMarketAppRequest)
        -> CoreResult<MarketApp>;

    /// Delete an entry
    async fn delete_app(&self, id: &str) -> CoreResult<()>;

    /// Copy an entry into the acting actor's workspace
    ///
    /// # Returns
    /// * `CloneOutcome` whose `result` is `"success"` or a backend result code
    async fn clone_to_workspace(&self, id: &str) -> CoreResult<CloneOutcome>;
}
