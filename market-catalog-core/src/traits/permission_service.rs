//! Permission evaluation abstract Trait

use std::collections::HashSet;

use crate::types::MarketApp;

/// Resource guarding catalog administration
pub const MARKET_ADMIN_RESOURCE: &str = "MARKET_ADMIN";

/// Action checked against [`MARKET_ADMIN_RESOURCE`]
pub const UPDATE_ACTION: &str = "update";

/// Permission service Trait
///
/// Evaluated in-process from the actor's session, so the methods are synchronous.
pub trait PermissionService: Send + Sync {
    /// Whether the acting actor may perform `action` on `resource`
    fn has_permission(&self, resource: &str, action: &str) -> bool;

    /// ID of the acting actor
    fn current_actor_id(&self) -> String;

    /// Catalog administrator (may edit anything and set the `important` flag)
    fn is_market_admin(&self) -> bool {
        self.has_permission(MARKET_ADMIN_RESOURCE, UPDATE_ACTION)
    }

    /// Administrator or creator of `app`; only these actors see edit/delete
    fn can_manage(&self, app: &MarketApp) -> bool {
        self.is_market_admin() || app.creator == self.current_actor_id()
    }
}

/// Fixed set of grants for one actor
///
/// Default implementation for embedders that resolve permissions once at login.
#[derive(Debug, Clone, Default)]
pub struct StaticPermissionService {
    actor_id: String,
    grants: HashSet<(String, String)>,
}

impl StaticPermissionService {
    #[must_use]
    pub fn new(actor_id: impl Into<String>) -> Self {
        Self {
            actor_id: actor_id.into(),
            grants: HashSet::new(),
        }
    }

    /// Add a `(resource, action)` grant
    #[must_use]
    pub fn grant(mut self, resource: &str, action: &str) -> Self {
        self.grants
            .insert((resource.to_string(), action.to_string()));
        self
    }

    /// Actor with catalog administration rights
    #[must_use]
    pub fn market_admin(actor_id: impl Into<String>) -> Self {
        Self::new(actor_id).grant(MARKET_ADMIN_RESOURCE, UPDATE_ACTION)
    }
}

impl PermissionService for StaticPermissionService {
    fn has_permission(&self, resource: &str, action: &str) -> bool {
        self.grants
            .contains(&(resource.to_string(), action.to_string()))
    }

    fn current_actor_id(&self) -> String {
        self.actor_id.clone()
    }
}
