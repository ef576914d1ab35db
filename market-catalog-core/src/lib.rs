//! Market App Catalog Core Library
//!
//! Client-side engines for a searchable, infinitely scrolling catalog of shareable
//! app templates:
//! - Pagination and filter engine (`InfiniteListController`)
//! - View/create/edit modal state machine (`EditorStateMachine`)
//! - Delete confirmation and cross-view refresh signalling
//!
//! The catalog API, permissions, notifications and the flag store are abstracted
//! through traits so that every platform injects its own implementation.

pub mod config;
pub mod error;
pub mod services;
pub mod traits;
pub mod types;
pub mod utils;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use config::CatalogConfig;
pub use error::{CoreError, CoreResult};
pub use services::{
    CatalogContext, CrossViewRefreshSignal, DeleteConfirmationFlow, EditorStateMachine,
    InfiniteListController, PaginationCursor,
};
pub use traits::{FlagStore, ListRefresh, MarketAppApi, Notifier, PermissionService};
