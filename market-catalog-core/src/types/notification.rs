//! User-facing notification types

use serde::{Deserialize, Serialize};

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

/// What happened; presentation localizes from this key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageKey {
    NameNotEmpty,
    AppCreated,
    AppCreateFailed,
    ModifiedSuccessfully,
    ModifiedUnsuccessfully,
    AppDeleted,
    AppDeleteFailed,
    ToMyWorkspaceSuccess,
    ToMyWorkspaceFailed,
}

impl MessageKey {
    /// Default (English) text
    #[must_use]
    pub fn default_text(self) -> &'static str {
        match self {
            Self::NameNotEmpty => "Name cannot be empty",
            Self::AppCreated => "App published to the market",
            Self::AppCreateFailed => "Failed to publish app",
            Self::ModifiedSuccessfully => "Modified successfully",
            Self::ModifiedUnsuccessfully => "Modification failed",
            Self::AppDeleted => "App deleted",
            Self::AppDeleteFailed => "Failed to delete app",
            Self::ToMyWorkspaceSuccess => "Copied to your workspace",
            Self::ToMyWorkspaceFailed => {
                "Failed to copy to your workspace, please contact the administrator"
            }
        }
    }
}

/// A fire-and-forget notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub key: MessageKey,
    /// Collaborator message appended to the text, when available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Notification {
    #[must_use]
    pub fn success(key: MessageKey) -> Self {
        Self {
            kind: NotificationKind::Success,
            key,
            detail: None,
        }
    }

    #[must_use]
    pub fn error(key: MessageKey) -> Self {
        Self {
            kind: NotificationKind::Error,
            key,
            detail: None,
        }
    }

    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        self.detail = (!detail.is_empty()).then_some(detail);
        self
    }

    /// Rendered text in the default language
    #[must_use]
    pub fn message(&self) -> String {
        match self.detail {
            Some(ref detail) => format!("{}: {detail}", self.key.default_text()),
            None => self.key.default_text().to_string(),
        }
    }
}
