//! Catalog configuration

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Default distance (px) from the end of the list at which the next page is requested
pub const DEFAULT_SCROLL_THRESHOLD_PX: u32 = 300;

/// Default key of the cross-view refresh flag
pub const DEFAULT_REFRESH_SIGNAL_KEY: &str = "NEED_REFRESH_MARKET_APP_LIST";

/// Catalog configuration
///
/// Every field has a default, so an empty JSON object is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CatalogConfig {
    /// Entries per page
    pub page_size: u32,
    /// Scroll-proximity threshold in pixels
    pub scroll_threshold_px: u32,
    /// Flag-store key used for cross-view refresh
    pub refresh_signal_key: String,
    /// Base URL of the console API (`.../console/api`), used by the HTTP adapter
    pub api_base_url: String,
    /// HTTP request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            scroll_threshold_px: DEFAULT_SCROLL_THRESHOLD_PX,
            refresh_signal_key: DEFAULT_REFRESH_SIGNAL_KEY.to_string(),
            api_base_url: "http://localhost:5001/console/api".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl CatalogConfig {
    /// Parse from JSON, filling missing fields with defaults
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| CoreError::ConfigError(e.to_string()))?;
        config.validated()
    }

    /// Clamp numeric values and reject unusable ones.
    ///
    /// - `page_size` is clamped to `1..=MAX_PAGE_SIZE`
    /// - `refresh_signal_key` must not be blank
    pub fn validated(mut self) -> CoreResult<Self> {
        self.page_size = self.page_size.clamp(1, MAX_PAGE_SIZE);
        self.request_timeout_secs = self.request_timeout_secs.max(1);
        if self.refresh_signal_key.trim().is_empty() {
            return Err(CoreError::ConfigError(
                "refreshSignalKey cannot be empty".to_string(),
            ));
        }
        self.api_base_url = self.api_base_url.trim_end_matches('/').to_string();
        Ok(self)
    }
}
