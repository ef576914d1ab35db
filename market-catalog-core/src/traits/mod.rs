//! Collaborator abstraction trait definition

mod flag_store;
mod in_memory_catalog;
mod list_refresh;
mod market_app_api;
mod notifier;
mod permission_service;

pub use flag_store::{FlagStore, InMemoryFlagStore};
pub use in_memory_catalog::{
    InMemoryMarketAppApi, MAX_SEARCH_CHARS, ROLE_ADMIN, ROLE_MANAGER, ROLE_SUB_MANAGER,
};
pub use list_refresh::ListRefresh;
pub use market_app_api::MarketAppApi;
pub use notifier::{LogNotifier, Notifier};
pub use permission_service::{
    PermissionService, StaticPermissionService, MARKET_ADMIN_RESOURCE, UPDATE_ACTION,
};
