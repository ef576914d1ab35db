//! 类型定义模块

mod filter;
mod market_app;
mod notification;
mod pagination;
mod response;
mod tag_set;

pub use filter::{Category, FilterState};
pub use market_app::{
    AppMode, CreateMarketAppRequest, MarketApp, SourceApp, UpdateMarketAppRequest,
};
pub use notification::{MessageKey, Notification, NotificationKind};
pub use pagination::{ListQuery, MarketAppPage, Page, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use response::{CloneOutcome, RESULT_APP_CALLER_ERROR, RESULT_NOT_FOUND, RESULT_SUCCESS};
pub use tag_set::TagSet;
