//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

/// Core layer error type
#[derive(Error, Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Market app not found
    #[error("Market app not found: {0}")]
    AppNotFound(String),

    /// Local validation failed (e.g. blank name)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The acting actor may not perform the operation
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Operation is not allowed in the current flow state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// The catalog API rejected the request
    #[error("API error: {message}")]
    ApiError {
        /// HTTP status, when the failure came over HTTP
        status: Option<u16>,
        message: String,
    },

    /// network error
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Request timed out
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Storage layer error (flag store)
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Invalid configuration
    #[error("Config error: {0}")]
    ConfigError(String),
}

impl CoreError {
    /// Whether it is expected behavior (user input, resource does not exist, etc.) is used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added. **
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::AppNotFound(_)
            | Self::ValidationError(_)
            | Self::PermissionDenied(_)
            | Self::InvalidState(_) => true,
            Self::ApiError { status, .. } => matches!(status, Some(400..=499)),
            _ => false,
        }
    }

    /// Message suitable for appending to a user-facing notification.
    ///
    /// API errors expose the server message as-is, everything else uses the display form.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::ApiError { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Shorthand for an API error without an HTTP status
    pub fn api(message: impl Into<String>) -> Self {
        Self::ApiError {
            status: None,
            message: message.into(),
        }
    }

    /// Log this error with the level chosen by [`Self::is_expected`].
    pub fn log(&self, context: &str) {
        if self.is_expected() {
            log::warn!("{context}: {self}");
        } else {
            log::error!("{context}: {self}");
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
