//! Durable key-value flag store abstract Trait

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::CoreResult;

/// Flag store Trait
///
/// Platform implementation:
/// - Desktop/CLI: `JsonFileFlagStore` (market-catalog-app)
/// - Tests and single-process embedders: `InMemoryFlagStore`
#[async_trait]
pub trait FlagStore: Send + Sync {
    /// Read the value stored under `key`
    ///
    /// # Returns
    /// * `Some(value)` - key present
    /// * `None` - key never written or removed
    async fn get(&self, key: &str) -> CoreResult<Option<String>>;

    /// Write `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: &str) -> CoreResult<()>;

    /// Remove `key` (missing keys are not an error)
    async fn remove(&self, key: &str) -> CoreResult<()>;
}

/// In-memory flag store
///
/// Clones share the same map, so two list instances built from one store see each other.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFlagStore {
    values: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryFlagStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FlagStore for InMemoryFlagStore {
    async fn get(&self, key: &str) -> CoreResult<Option<String>> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        self.values
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> CoreResult<()> {
        self.values.write().await.remove(key);
        Ok(())
    }
}
