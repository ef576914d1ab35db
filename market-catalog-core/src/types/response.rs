//! API 响应相关类型定义

use serde::{Deserialize, Serialize};

/// Result code the backend uses for a completed operation
pub const RESULT_SUCCESS: &str = "success";

/// Result code for a workflow that references other apps through an app-caller node
pub const RESULT_APP_CALLER_ERROR: &str = "app_caller_error";

/// Result code for an unknown or deleted entry
pub const RESULT_NOT_FOUND: &str = "not_found";

/// `{ "result": ... }` envelope returned by clone (and by create/update on some deployments)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloneOutcome {
    pub result: String,
}

impl CloneOutcome {
    #[must_use]
    pub fn new(result: impl Into<String>) -> Self {
        Self {
            result: result.into(),
        }
    }

    #[must_use]
    pub fn success() -> Self {
        Self::new(RESULT_SUCCESS)
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.result == RESULT_SUCCESS
    }
}
