//! Two-step delete confirmation

use std::sync::Arc;

use super::CatalogContext;
use crate::error::{CoreError, CoreResult};
use crate::traits::ListRefresh;
use crate::types::{MarketApp, MessageKey, Notification};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeleteDialogState {
    #[default]
    Hidden,
    Shown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The catalog API failed; nothing was removed
    Failed(CoreError),
}

/// Delete confirmation for one entry
pub struct DeleteConfirmationFlow {
    ctx: Arc<CatalogContext>,
    list: Arc<dyn ListRefresh>,
    app: MarketApp,
    state: DeleteDialogState,
}

impl DeleteConfirmationFlow {
    #[must_use]
    pub fn new(ctx: Arc<CatalogContext>, list: Arc<dyn ListRefresh>, app: MarketApp) -> Self {
        Self {
            ctx,
            list,
            app,
            state: DeleteDialogState::Hidden,
        }
    }

    #[must_use]
    pub fn state(&self) -> DeleteDialogState {
        self.state
    }

    /// Show the confirmation; only actors that manage the entry may delete it
    pub fn request_delete(&mut self) -> CoreResult<()> {
        if !self.ctx.permissions.can_manage(&self.app) {
            return Err(CoreError::PermissionDenied(format!(
                "Actor {} may not delete market app {}",
                self.ctx.permissions.current_actor_id(),
                self.app.id
            )));
        }
        self.state = DeleteDialogState::Shown;
        Ok(())
    }

    pub fn cancel(&mut self) {
        self.state = DeleteDialogState::Hidden;
    }

    /// Delete the entry.
    ///
    /// On success the entry is dropped from the list and page 0 is re-fetched.
    /// Either way the dialog ends hidden.
    pub async fn confirm(&mut self) -> CoreResult<DeleteOutcome> {
        if self.state != DeleteDialogState::Shown {
            return Err(CoreError::InvalidState(
                "Delete was not requested".to_string(),
            ));
        }
        self.state = DeleteDialogState::Hidden;

        let id = self.app.id.as_str();
        match self.ctx.api.delete_app(id).await {
            Ok(()) => {
                log::info!("Market app {id} deleted");
                self.ctx
                    .notifier
                    .notify(Notification::success(MessageKey::AppDeleted));
                self.list.remove_item(id).await;
                self.list.refresh().await;
                self.ctx.refresh_signal.publish().await;
                Ok(DeleteOutcome::Deleted)
            }
            Err(e) => {
                e.log(&format!("Failed to delete market app {id}"));
                self.ctx.notifier.notify(
                    Notification::error(MessageKey::AppDeleteFailed).with_detail(e.user_message()),
                );
                Ok(DeleteOutcome::Failed(e))
            }
        }
    }
}
