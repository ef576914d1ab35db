//! Application bootstrap for the market app catalog.
//!
//! Provides `CatalogApp` (context plus the shared list controller),
//! `CatalogAppBuilder` (collaborator injection) and the platform adapters.

pub mod adapters;

use std::path::Path;
use std::sync::Arc;

use market_catalog_core::config::CatalogConfig;
use market_catalog_core::error::{CoreError, CoreResult};
use market_catalog_core::services::{
    CatalogContext, CrossViewRefreshSignal, DeleteConfirmationFlow, EditorStateMachine,
    InfiniteListController, LoadOutcome,
};
use market_catalog_core::traits::{
    FlagStore, InMemoryFlagStore, ListRefresh, LogNotifier, MarketAppApi, Notifier,
    PermissionService,
};
use market_catalog_core::types::MarketApp;

use crate::adapters::HttpMarketAppApi;

/// Read a JSON config file; a missing file yields the defaults
pub async fn load_config(path: &Path) -> CoreResult<CatalogConfig> {
    match tokio::fs::read_to_string(path).await {
        Ok(raw) => CatalogConfig::from_json(&raw),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::info!(
                "No catalog config at {}, using defaults",
                path.display()
            );
            CatalogConfig::default().validated()
        }
        Err(e) => Err(CoreError::ConfigError(format!(
            "Failed to read {}: {e}",
            path.display()
        ))),
    }
}

/// Catalog screen state.
///
/// Holds the `CatalogContext` and the list every editor and delete flow refreshes.
pub struct CatalogApp {
    pub ctx: Arc<CatalogContext>,
    pub list: Arc<InfiniteListController>,
}

impl CatalogApp {
    /// Load the first page
    pub async fn start(&self) -> LoadOutcome {
        self.list.request_more().await
    }

    fn list_refresh(&self) -> Arc<dyn ListRefresh> {
        Arc::clone(&self.list) as Arc<dyn ListRefresh>
    }

    #[must_use]
    pub fn editor(&self) -> EditorStateMachine {
        self.ctx.editor(self.list_refresh())
    }

    #[must_use]
    pub fn delete_flow(&self, app: MarketApp) -> DeleteConfirmationFlow {
        self.ctx.delete_flow(self.list_refresh(), app)
    }
}

/// Builder for constructing `CatalogApp` with platform-specific adapters.
///
/// # Required
/// - `permissions` - who the acting actor is and what it may do
///
/// # Optional
/// - `config` - defaults to `CatalogConfig::default()`
/// - `api` - defaults to `HttpMarketAppApi` against `config.api_base_url`
/// - `notifier` - defaults to `LogNotifier`
/// - `flag_store` - defaults to `InMemoryFlagStore`
#[derive(Default)]
pub struct CatalogAppBuilder {
    config: Option<CatalogConfig>,
    api: Option<Arc<dyn MarketAppApi>>,
    permissions: Option<Arc<dyn PermissionService>>,
    notifier: Option<Arc<dyn Notifier>>,
    flag_store: Option<Arc<dyn FlagStore>>,
}

impl CatalogAppBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn config(mut self, config: CatalogConfig) -> Self {
        self.config = Some(config);
        self
    }

    #[must_use]
    pub fn api(mut self, api: Arc<dyn MarketAppApi>) -> Self {
        self.api = Some(api);
        self
    }

    #[must_use]
    pub fn permissions(mut self, permissions: Arc<dyn PermissionService>) -> Self {
        self.permissions = Some(permissions);
        self
    }

    #[must_use]
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    #[must_use]
    pub fn flag_store(mut self, store: Arc<dyn FlagStore>) -> Self {
        self.flag_store = Some(store);
        self
    }

    /// Build the `CatalogApp`.
    ///
    /// # Errors
    /// `ValidationError` when `permissions` is missing, `ConfigError` for an
    /// invalid config or an HTTP client that cannot be created.
    pub fn build(self) -> CoreResult<CatalogApp> {
        let config = self.config.unwrap_or_default().validated()?;
        let permissions = self
            .permissions
            .ok_or_else(|| CoreError::ValidationError("permissions is required".to_string()))?;
        let api: Arc<dyn MarketAppApi> = match self.api {
            Some(api) => api,
            None => Arc::new(HttpMarketAppApi::new(&config)?),
        };
        let notifier = self.notifier.unwrap_or_else(|| Arc::new(LogNotifier));
        let flag_store = self
            .flag_store
            .unwrap_or_else(|| Arc::new(InMemoryFlagStore::new()));

        let signal = Arc::new(CrossViewRefreshSignal::new(
            flag_store,
            config.refresh_signal_key.clone(),
        ));
        let ctx = Arc::new(CatalogContext::new(
            api,
            permissions,
            notifier,
            signal,
            config,
        ));
        let list = Arc::new(ctx.list_controller());

        log::info!(
            "Market catalog ready for actor {}",
            ctx.permissions.current_actor_id()
        );
        Ok(CatalogApp { ctx, list })
    }
}
