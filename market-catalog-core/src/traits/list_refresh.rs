//! Callback from mutation flows into the list

use async_trait::async_trait;

/// Implemented by the list controller; editor and delete flows call it after a
/// successful mutation.
#[async_trait]
pub trait ListRefresh: Send + Sync {
    /// Re-fetch the first page in place
    async fn refresh(&self);

    /// Drop an entry the server confirmed as deleted
    async fn remove_item(&self, id: &str);
}
