//! Platform adapters for the catalog collaborators

mod http_client;
mod http_market_app_api;
mod json_flag_store;

pub use http_client::{truncate_for_log, HttpUtils};
pub use http_market_app_api::HttpMarketAppApi;
pub use json_flag_store::JsonFileFlagStore;
