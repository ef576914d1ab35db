//! 测试辅助模块
//!
//! Mock collaborators and factory functions for the engine tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{oneshot, RwLock};

use crate::config::CatalogConfig;
use crate::error::{CoreError, CoreResult};
use crate::services::{CatalogContext, CrossViewRefreshSignal};
use crate::traits::{
    FlagStore, InMemoryFlagStore, InMemoryMarketAppApi, ListRefresh, MarketAppApi, Notifier,
    StaticPermissionService,
};
use crate::types::{
    AppMode, CloneOutcome, CreateMarketAppRequest, ListQuery, MarketApp, MarketAppPage,
    Notification, SourceApp, UpdateMarketAppRequest,
};

// ===== Factories =====

/// Chat entry owned by `owner`
pub fn sample_app(id: &str) -> MarketApp {
    MarketApp {
        id: id.to_string(),
        name: format!("Sample {id}"),
        description: String::new(),
        mode: AppMode::Chat,
        tags: vec![AppMode::Chat.derived_tag()],
        creator: "owner".to_string(),
        important: false,
        updated_at: Utc::now(),
    }
}

pub fn sample_source(id: &str, mode: AppMode) -> SourceApp {
    SourceApp {
        id: id.to_string(),
        name: format!("Source {id}"),
        mode,
    }
}

/// Catalog holding `app-0` .. `app-{count-1}` (newest last)
pub async fn seeded_catalog(count: usize) -> InMemoryMarketAppApi {
    let api = InMemoryMarketAppApi::new("owner");
    for i in 0..count {
        api.insert(sample_app(&format!("app-{i}"))).await;
    }
    api
}

/// Yield until the mock has received `count` list calls
pub async fn wait_for_list_calls(api: &MockMarketAppApi, count: usize) {
    while api.list_call_count() < count {
        tokio::task::yield_now().await;
    }
}

// ===== MockMarketAppApi =====

/// Wraps an in-memory catalog, recording calls and injecting failures.
///
/// A gated mock holds every list response until the test releases it.
pub struct MockMarketAppApi {
    inner: InMemoryMarketAppApi,
    gated: bool,
    waiters: Mutex<VecDeque<oneshot::Sender<()>>>,
    list_calls: RwLock<Vec<ListQuery>>,
    list_call_count: AtomicUsize,
    concurrent_lists: AtomicUsize,
    max_concurrent_lists: AtomicUsize,
    list_error: RwLock<Option<String>>,
    mutation_error: RwLock<Option<CoreError>>,
    clone_result: RwLock<Option<String>>,
    mutation_calls: AtomicUsize,
}

impl MockMarketAppApi {
    pub fn new(inner: InMemoryMarketAppApi) -> Self {
        Self {
            inner,
            gated: false,
            waiters: Mutex::new(VecDeque::new()),
            list_calls: RwLock::new(Vec::new()),
            list_call_count: AtomicUsize::new(0),
            concurrent_lists: AtomicUsize::new(0),
            max_concurrent_lists: AtomicUsize::new(0),
            list_error: RwLock::new(None),
            mutation_error: RwLock::new(None),
            clone_result: RwLock::new(None),
            mutation_calls: AtomicUsize::new(0),
        }
    }

    pub fn gated(inner: InMemoryMarketAppApi) -> Self {
        Self {
            gated: true,
            ..Self::new(inner)
        }
    }

    pub fn catalog(&self) -> &InMemoryMarketAppApi {
        &self.inner
    }

    /// Release the `count` oldest held list calls
    pub fn release(&self, count: usize) {
        let mut waiters = self.waiters.lock().unwrap();
        for _ in 0..count {
            if let Some(tx) = waiters.pop_front() {
                let _ = tx.send(());
            }
        }
    }

    /// Release the `count` newest held list calls
    pub fn release_latest(&self, count: usize) {
        let mut waiters = self.waiters.lock().unwrap();
        for _ in 0..count {
            if let Some(tx) = waiters.pop_back() {
                let _ = tx.send(());
            }
        }
    }

    pub async fn list_calls(&self) -> Vec<ListQuery> {
        self.list_calls.read().await.clone()
    }

    pub fn list_call_count(&self) -> usize {
        self.list_call_count.load(Ordering::SeqCst)
    }

    pub fn max_concurrent_lists(&self) -> usize {
        self.max_concurrent_lists.load(Ordering::SeqCst)
    }

    /// Create/update/delete/clone calls received
    pub fn mutation_calls(&self) -> usize {
        self.mutation_calls.load(Ordering::SeqCst)
    }

    pub async fn fail_lists(&self, message: Option<&str>) {
        *self.list_error.write().await = message.map(str::to_string);
    }

    pub async fn fail_mutations(&self, err: Option<CoreError>) {
        *self.mutation_error.write().await = err;
    }

    /// Override the clone result code
    pub async fn set_clone_result(&self, result: Option<&str>) {
        *self.clone_result.write().await = result.map(str::to_string);
    }

    async fn begin_mutation(&self) -> CoreResult<()> {
        self.mutation_calls.fetch_add(1, Ordering::SeqCst);
        match *self.mutation_error.read().await {
            Some(ref err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl MarketAppApi for MockMarketAppApi {
    async fn list_apps(&self, query: &ListQuery) -> CoreResult<MarketAppPage> {
        self.list_calls.write().await.push(query.clone());
        let running = self.concurrent_lists.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_concurrent_lists.fetch_max(running, Ordering::SeqCst);

        if self.gated {
            let (tx, rx) = oneshot::channel();
            self.waiters.lock().unwrap().push_back(tx);
            self.list_call_count.fetch_add(1, Ordering::SeqCst);
            let _ = rx.await;
        } else {
            self.list_call_count.fetch_add(1, Ordering::SeqCst);
        }
        self.concurrent_lists.fetch_sub(1, Ordering::SeqCst);

        if let Some(ref msg) = *self.list_error.read().await {
            return Err(CoreError::NetworkError(msg.clone()));
        }
        self.inner.list_apps(query).await
    }

    async fn create_app(&self, request: &CreateMarketAppRequest) -> CoreResult<MarketApp> {
        self.begin_mutation().await?;
        self.inner.create_app(request).await
    }

    async fn update_app(
        &self,
        id: &str,
        request: &UpdateMarketAppRequest,
    ) -> CoreResult<MarketApp> {
        self.begin_mutation().await?;
        self.inner.update_app(id, request).await
    }

    async fn delete_app(&self, id: &str) -> CoreResult<()> {
        self.begin_mutation().await?;
        self.inner.delete_app(id).await
    }

    async fn clone_to_workspace(&self, id: &str) -> CoreResult<CloneOutcome> {
        self.begin_mutation().await?;
        if let Some(ref result) = *self.clone_result.read().await {
            return Ok(CloneOutcome::new(result.clone()));
        }
        self.inner.clone_to_workspace(id).await
    }
}

// ===== RecordingNotifier =====

#[derive(Default)]
pub struct RecordingNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<Notification> {
        self.notifications.lock().unwrap().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.notifications.lock().unwrap().push(notification);
    }
}

// ===== RecordingListRefresh =====

#[derive(Default)]
pub struct RecordingListRefresh {
    refreshes: AtomicUsize,
    removed: RwLock<Vec<String>>,
}

impl RecordingListRefresh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refreshes(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }

    pub async fn removed(&self) -> Vec<String> {
        self.removed.read().await.clone()
    }
}

#[async_trait]
impl ListRefresh for RecordingListRefresh {
    async fn refresh(&self) {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
    }

    async fn remove_item(&self, id: &str) {
        self.removed.write().await.push(id.to_string());
    }
}

// ===== FailingFlagStore =====

pub struct FailingFlagStore;

#[async_trait]
impl FlagStore for FailingFlagStore {
    async fn get(&self, _key: &str) -> CoreResult<Option<String>> {
        Err(CoreError::StorageError("unavailable".to_string()))
    }

    async fn set(&self, _key: &str, _value: &str) -> CoreResult<()> {
        Err(CoreError::StorageError("unavailable".to_string()))
    }

    async fn remove(&self, _key: &str) -> CoreResult<()> {
        Err(CoreError::StorageError("unavailable".to_string()))
    }
}

// ===== Context =====

pub struct TestContext {
    pub ctx: Arc<CatalogContext>,
    pub api: Arc<MockMarketAppApi>,
    pub notifier: Arc<RecordingNotifier>,
    pub flags: InMemoryFlagStore,
}

impl TestContext {
    /// A second signal on the same flag store, as another open list would hold
    pub fn peer_signal(&self) -> CrossViewRefreshSignal {
        CrossViewRefreshSignal::new(
            Arc::new(self.flags.clone()),
            self.ctx.config.refresh_signal_key.clone(),
        )
    }
}

/// Context acting as `permissions`, over a catalog seeded with `count` entries
pub async fn create_test_context(
    permissions: StaticPermissionService,
    count: usize,
) -> TestContext {
    let api = Arc::new(MockMarketAppApi::new(seeded_catalog(count).await));
    let notifier = Arc::new(RecordingNotifier::new());
    let flags = InMemoryFlagStore::new();
    let config = CatalogConfig::default();
    let signal = Arc::new(CrossViewRefreshSignal::new(
        Arc::new(flags.clone()),
        config.refresh_signal_key.clone(),
    ));
    let ctx = Arc::new(CatalogContext::new(
        Arc::clone(&api) as Arc<dyn MarketAppApi>,
        Arc::new(permissions),
        Arc::clone(&notifier) as Arc<dyn Notifier>,
        signal,
        config,
    ));
    TestContext {
        ctx,
        api,
        notifier,
        flags,
    }
}
