//! 业务逻辑服务层

mod delete_flow;
mod editor;
mod infinite_list;
mod pagination_cursor;
mod refresh_signal;

pub use delete_flow::{DeleteConfirmationFlow, DeleteDialogState, DeleteOutcome};
pub use editor::{
    EditorField, EditorFormData, EditorSnapshot, EditorState, EditorStateMachine, OpenRequest,
    SubmitOutcome, TakeOutcome,
};
pub use infinite_list::{InfiniteListController, ListSnapshot, LoadOutcome};
pub use pagination_cursor::PaginationCursor;
pub use refresh_signal::{CrossViewRefreshSignal, FreshnessMarker};

use std::sync::Arc;

use crate::config::CatalogConfig;
use crate::traits::{ListRefresh, MarketAppApi, Notifier, PermissionService};
use crate::types::MarketApp;

/// 服务上下文 - 持有所有依赖
///
/// The platform layer builds this once and injects its collaborators.
pub struct CatalogContext {
    /// Catalog API
    pub api: Arc<dyn MarketAppApi>,
    /// Permission evaluation for the acting actor
    pub permissions: Arc<dyn PermissionService>,
    /// Notification sink
    pub notifier: Arc<dyn Notifier>,
    /// Cross-view refresh signal, published after successful mutations
    pub refresh_signal: Arc<CrossViewRefreshSignal>,
    pub config: CatalogConfig,
}

impl CatalogContext {
    #[must_use]
    pub fn new(
        api: Arc<dyn MarketAppApi>,
        permissions: Arc<dyn PermissionService>,
        notifier: Arc<dyn Notifier>,
        refresh_signal: Arc<CrossViewRefreshSignal>,
        config: CatalogConfig,
    ) -> Self {
        Self {
            api,
            permissions,
            notifier,
            refresh_signal,
            config,
        }
    }

    /// List controller listening to this context's refresh signal
    #[must_use]
    pub fn list_controller(&self) -> InfiniteListController {
        InfiniteListController::new(Arc::clone(&self.api), &self.config)
            .with_refresh_signal(Arc::clone(&self.refresh_signal))
    }

    #[must_use]
    pub fn editor(self: &Arc<Self>, list: Arc<dyn ListRefresh>) -> EditorStateMachine {
        EditorStateMachine::new(Arc::clone(self), list)
    }

    #[must_use]
    pub fn delete_flow(
        self: &Arc<Self>,
        list: Arc<dyn ListRefresh>,
        app: MarketApp,
    ) -> DeleteConfirmationFlow {
        DeleteConfirmationFlow::new(Arc::clone(self), list, app)
    }

    /// Whether the edit/delete operations are offered for `app`
    #[must_use]
    pub fn can_manage(&self, app: &MarketApp) -> bool {
        self.permissions.can_manage(app)
    }
}
