//! Cross-view "please refetch" signal
//!
//! A freshness marker is written into a [`FlagStore`] after every successful mutation.
//! Other list instances poll the store and refresh their first page when the stored
//! marker differs from the last one they handled.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::error::{CoreError, CoreResult};
use crate::traits::FlagStore;

/// Value stored under the signal key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreshnessMarker {
    pub timestamp_ms: i64,
    /// Origin ID of the writing instance
    pub origin: String,
}

impl FreshnessMarker {
    /// Parse a stored value.
    ///
    /// A bare legacy flag (anything that is not a marker object) is read as a
    /// foreign marker with timestamp 0.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        serde_json::from_str(raw).unwrap_or_else(|_| Self {
            timestamp_ms: 0,
            origin: String::new(),
        })
    }
}

/// Cross-view refresh signal bound to one flag store key
pub struct CrossViewRefreshSignal {
    store: Arc<dyn FlagStore>,
    key: String,
    origin: String,
    /// Markers written before this instance existed are ignored
    since_ms: i64,
    last_handled: Mutex<Option<FreshnessMarker>>,
    /// Strictly increasing per instance, so two publishes never write the same marker
    last_published_ms: Mutex<i64>,
}

impl CrossViewRefreshSignal {
    #[must_use]
    pub fn new(store: Arc<dyn FlagStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            origin: uuid::Uuid::new_v4().to_string(),
            since_ms: Utc::now().timestamp_millis(),
            last_handled: Mutex::new(None),
            last_published_ms: Mutex::new(0),
        }
    }

    /// This instance's origin ID
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Write a fresh marker.
    ///
    /// Best-effort: failures are logged and swallowed.
    pub async fn publish(&self) {
        if let Err(e) = self.try_publish().await {
            e.log("Failed to publish market list refresh signal");
        }
    }

    async fn try_publish(&self) -> CoreResult<()> {
        let timestamp_ms = {
            let mut last = self.last_published_ms.lock().await;
            *last = Utc::now().timestamp_millis().max(*last + 1);
            *last
        };
        let marker = FreshnessMarker {
            timestamp_ms,
            origin: self.origin.clone(),
        };
        let value = serde_json::to_string(&marker)
            .map_err(|e| CoreError::SerializationError(e.to_string()))?;
        self.store.set(&self.key, &value).await?;
        log::debug!("Published refresh signal at {}", marker.timestamp_ms);
        Ok(())
    }

    /// Whether a foreign marker other than the last handled one is present.
    ///
    /// Returns `true` at most once per marker. Read failures count as "no signal".
    pub async fn poll(&self) -> bool {
        let raw = match self.store.get(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return false,
            Err(e) => {
                e.log("Failed to read market list refresh signal");
                return false;
            }
        };
        let marker = FreshnessMarker::parse(&raw);
        if marker.origin == self.origin || marker.timestamp_ms < self.since_ms {
            return false;
        }

        let mut last_handled = self.last_handled.lock().await;
        if last_handled.as_ref() == Some(&marker) {
            return false;
        }
        log::debug!("Refresh signal from {} at {}", marker.origin, marker.timestamp_ms);
        *last_handled = Some(marker);
        true
    }
}
