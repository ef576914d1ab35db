//! In-memory catalog API
//!
//! Mirrors the catalog backend's listing rules (live entries only, important first,
//! newest first, 30-character search over name and tags) and its role checks, so that
//! the engines can be exercised end to end without a server.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use super::MarketAppApi;
use crate::error::{CoreError, CoreResult};
use crate::types::{
    CloneOutcome, CreateMarketAppRequest, ListQuery, MarketApp, MarketAppPage,
    UpdateMarketAppRequest, MAX_PAGE_SIZE, RESULT_APP_CALLER_ERROR, RESULT_NOT_FOUND,
};

/// Longest search term the backend honours
pub const MAX_SEARCH_CHARS: usize = 30;

pub const ROLE_ADMIN: &str = "ADMIN";
pub const ROLE_MANAGER: &str = "MANAGER";
pub const ROLE_SUB_MANAGER: &str = "SUB_MANAGER";

/// Roles allowed to publish new entries
const PUBLISHER_ROLES: [&str; 3] = [ROLE_ADMIN, ROLE_MANAGER, ROLE_SUB_MANAGER];

#[derive(Debug, Clone)]
struct StoredEntry {
    app: MarketApp,
    /// Publish order, newest has the highest value
    seq: u64,
    deleted: bool,
}

#[derive(Debug, Default)]
struct CatalogState {
    entries: Vec<StoredEntry>,
    next_seq: u64,
    /// Source app IDs whose workflow contains an app-caller node
    app_caller_sources: HashSet<String>,
    /// Entry IDs copied into the actor's workspace, in order
    workspace_copies: Vec<String>,
}

/// In-memory catalog
#[derive(Debug, Clone)]
pub struct InMemoryMarketAppApi {
    actor_id: String,
    roles: Vec<String>,
    state: Arc<RwLock<CatalogState>>,
}

impl InMemoryMarketAppApi {
    /// Create an empty catalog acting as `actor_id` with the `MANAGER` role.
    ///
    /// Entries created through the API are owned by `actor_id`.
    #[must_use]
    pub fn new(actor_id: impl Into<String>) -> Self {
        Self {
            actor_id: actor_id.into(),
            roles: vec![ROLE_MANAGER.to_string()],
            state: Arc::new(RwLock::new(CatalogState::default())),
        }
    }

    /// Replace the acting roles
    #[must_use]
    pub fn with_roles(mut self, roles: &[&str]) -> Self {
        self.roles = roles.iter().map(|r| (*r).to_string()).collect();
        self
    }

    fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Admins manage every entry, everyone else only their own
    fn ensure_manages(&self, app: &MarketApp) -> CoreResult<()> {
        if self.has_role(ROLE_ADMIN) || app.creator == self.actor_id {
            Ok(())
        } else {
            Err(CoreError::PermissionDenied(format!(
                "{} may not modify market app {}",
                self.actor_id, app.id
            )))
        }
    }

    /// Seed an existing entry (published after every entry seeded before it)
    pub async fn insert(&self, app: MarketApp) {
        let mut state = self.state.write().await;
        let seq = state.next_seq;
        state.next_seq += 1;
        state.entries.push(StoredEntry {
            app,
            seq,
            deleted: false,
        });
    }

    /// Mark a source app as containing an app-caller node; publishing it is rejected
    pub async fn mark_app_caller_source(&self, source_id: &str) {
        self.state
            .write()
            .await
            .app_caller_sources
            .insert(source_id.to_string());
    }

    /// Entry IDs copied into the workspace so far
    pub async fn workspace_copies(&self) -> Vec<String> {
        self.state.read().await.workspace_copies.clone()
    }

    /// Live entry by ID
    pub async fn get(&self, id: &str) -> Option<MarketApp> {
        self.state
            .read()
            .await
            .entries
            .iter()
            .find(|e| e.app.id == id && !e.deleted)
            .map(|e| e.app.clone())
    }

    fn matches_search(app: &MarketApp, search: &str) -> bool {
        let needle = search.to_lowercase();
        app.name.to_lowercase().contains(&needle) || app.tags.iter().any(|t| t == search)
    }
}

#[async_trait]
impl MarketAppApi for InMemoryMarketAppApi {
    async fn list_apps(&self, query: &ListQuery) -> CoreResult<MarketAppPage> {
        let query = query.validated(MAX_PAGE_SIZE);
        let search: Option<String> = query
            .search
            .as_deref()
            .map(|s| s.chars().take(MAX_SEARCH_CHARS).collect());

        let state = self.state.read().await;
        let mut live: Vec<&StoredEntry> = state
            .entries
            .iter()
            .filter(|e| !e.deleted)
            .filter(|e| query.mode.is_none_or(|mode| e.app.mode == mode))
            .filter(|e| {
                search
                    .as_deref()
                    .is_none_or(|s| Self::matches_search(&e.app, s))
            })
            .collect();
        live.sort_by(|a, b| {
            b.app
                .important
                .cmp(&a.app.important)
                .then(b.seq.cmp(&a.seq))
        });

        let limit = query.limit as usize;
        let offset = (query.page as usize - 1) * limit;
        let items: Vec<MarketApp> = live
            .iter()
            .skip(offset)
            .take(limit)
            .map(|e| e.app.clone())
            .collect();
        let has_more = offset + items.len() < live.len();

        log::debug!(
            "[in-memory] list page={} limit={} -> {} items, has_more={has_more}",
            query.page,
            query.limit,
            items.len()
        );
        Ok(MarketAppPage::new(items, has_more))
    }

    async fn create_app(&self, request: &CreateMarketAppRequest) -> CoreResult<MarketApp> {
        if !PUBLISHER_ROLES.iter().any(|role| self.has_role(role)) {
            return Err(CoreError::PermissionDenied(format!(
                "{} may not publish market apps",
                self.actor_id
            )));
        }
        let mut state = self.state.write().await;
        if state.app_caller_sources.contains(&request.app_id) {
            return Err(CoreError::api(RESULT_APP_CALLER_ERROR));
        }

        let app = MarketApp {
            id: uuid::Uuid::new_v4().to_string(),
            name: request.name.clone(),
            description: request.description.clone(),
            mode: request.mode,
            tags: request.tags.clone(),
            creator: self.actor_id.clone(),
            important: request.important,
            updated_at: Utc::now(),
        };
        let seq = state.next_seq;
        state.next_seq += 1;
        state.entries.push(StoredEntry {
            app: app.clone(),
            seq,
            deleted: false,
        });
        Ok(app)
    }

    async fn update_app(
        &self,
        id: &str,
        request: &UpdateMarketAppRequest,
    ) -> CoreResult<MarketApp> {
        let mut state = self.state.write().await;
        let entry = state
            .entries
            .iter_mut()
            .find(|e| e.app.id == id && !e.deleted)
            .ok_or_else(|| CoreError::AppNotFound(id.to_string()))?;
        self.ensure_manages(&entry.app)?;
        request.apply_to(&mut entry.app);
        Ok(entry.app.clone())
    }

    async fn delete_app(&self, id: &str) -> CoreResult<()> {
        let mut state = self.state.write().await;
        let entry = state
            .entries
            .iter_mut()
            .find(|e| e.app.id == id && !e.deleted)
            .ok_or_else(|| CoreError::AppNotFound(id.to_string()))?;
        self.ensure_manages(&entry.app)?;
        entry.deleted = true;
        entry.app.updated_at = Utc::now();
        Ok(())
    }

    async fn clone_to_workspace(&self, id: &str) -> CoreResult<CloneOutcome> {
        let mut state = self.state.write().await;
        if !state.entries.iter().any(|e| e.app.id == id && !e.deleted) {
            return Ok(CloneOutcome::new(RESULT_NOT_FOUND));
        }
        state.workspace_copies.push(id.to_string());
        Ok(CloneOutcome::success())
    }
}
