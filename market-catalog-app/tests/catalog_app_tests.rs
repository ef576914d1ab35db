#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
//! Integration tests for `CatalogAppBuilder` and the flows it wires.

use std::sync::{Arc, Mutex};

use market_catalog_app::adapters::JsonFileFlagStore;
use market_catalog_app::{load_config, CatalogApp, CatalogAppBuilder};
use market_catalog_core::config::CatalogConfig;
use market_catalog_core::error::CoreError;
use market_catalog_core::services::{
    DeleteOutcome, EditorField, EditorState, LoadOutcome, OpenRequest, SubmitOutcome,
};
use market_catalog_core::traits::{
    InMemoryMarketAppApi, MarketAppApi, Notifier, StaticPermissionService,
};
use market_catalog_core::types::{
    AppMode, Category, MarketApp, MessageKey, Notification, SourceApp,
};

// ===== Helpers =====

#[derive(Default)]
struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    fn keys(&self) -> Vec<MessageKey> {
        self.seen.lock().unwrap().iter().map(|n| n.key).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen.lock().unwrap().push(notification);
    }
}

fn entry(id: &str, mode: AppMode, creator: &str) -> MarketApp {
    MarketApp {
        id: id.to_string(),
        name: format!("Entry {id}"),
        description: String::new(),
        mode,
        tags: vec![mode.derived_tag()],
        creator: creator.to_string(),
        important: false,
        updated_at: chrono::Utc::now(),
    }
}

async fn catalog(count: usize) -> Arc<InMemoryMarketAppApi> {
    let api = InMemoryMarketAppApi::new("alice");
    for i in 0..count {
        api.insert(entry(&format!("e{i}"), AppMode::Chat, "alice"))
            .await;
    }
    Arc::new(api)
}

fn build(
    api: Arc<InMemoryMarketAppApi>,
    actor: StaticPermissionService,
    notifier: Arc<RecordingNotifier>,
) -> CatalogApp {
    CatalogAppBuilder::new()
        .api(api)
        .permissions(Arc::new(actor))
        .notifier(notifier)
        .build()
        .expect("builder should succeed")
}

// ===== Builder =====

#[test]
fn build_requires_permissions() {
    let result = CatalogAppBuilder::new().build();
    assert!(matches!(result, Err(CoreError::ValidationError(_))));
}

#[test]
fn build_rejects_invalid_config() {
    let result = CatalogAppBuilder::new()
        .permissions(Arc::new(StaticPermissionService::new("alice")))
        .config(CatalogConfig {
            refresh_signal_key: " ".to_string(),
            ..Default::default()
        })
        .build();
    assert!(matches!(result, Err(CoreError::ConfigError(_))));
}

#[test]
fn build_defaults_to_http_api() {
    let app = CatalogAppBuilder::new()
        .permissions(Arc::new(StaticPermissionService::new("alice")))
        .build()
        .unwrap();
    assert_eq!(app.ctx.config, CatalogConfig::default());
}

#[tokio::test]
async fn load_config_reads_file_or_defaults() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("catalog.json");

    let config = load_config(&path).await.unwrap();
    assert_eq!(config, CatalogConfig::default());

    tokio::fs::write(&path, r#"{"pageSize": 5, "scrollThresholdPx": 120}"#)
        .await
        .unwrap();
    let config = load_config(&path).await.unwrap();
    assert_eq!(config.page_size, 5);
    assert_eq!(config.scroll_threshold_px, 120);

    tokio::fs::write(&path, "not json").await.unwrap();
    assert!(matches!(
        load_config(&path).await,
        Err(CoreError::ConfigError(_))
    ));
}

// ===== Flows =====

#[tokio::test]
async fn browse_filter_and_scroll() {
    let api = catalog(45).await;
    api.insert(entry("wf", AppMode::Workflow, "bob")).await;
    let app = build(
        api,
        StaticPermissionService::new("alice"),
        Arc::new(RecordingNotifier::default()),
    );

    assert_eq!(app.start().await, LoadOutcome::Appended);
    assert_eq!(app.list.total_count().await, 20);
    while app.list.scroll_proximity_trigger(0).await == LoadOutcome::Appended {}
    assert_eq!(app.list.total_count().await, 46);
    assert!(!app.list.has_more().await);

    app.list
        .set_filter(Category::Mode(AppMode::Workflow), "")
        .await;
    let items = app.list.items().await;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, "wf");
}

#[tokio::test]
async fn publish_then_delete_round_trip() {
    let api = catalog(2).await;
    let notifier = Arc::new(RecordingNotifier::default());
    let app = build(
        Arc::clone(&api),
        StaticPermissionService::new("alice"),
        Arc::clone(&notifier),
    );
    app.start().await;

    let mut editor = app.editor();
    editor.open(OpenRequest::Create(SourceApp {
        id: "ws-1".to_string(),
        name: "Workspace bot".to_string(),
        mode: AppMode::AgentChat,
    }));
    editor
        .set_field(EditorField::Name("Published bot".to_string()))
        .unwrap();
    editor.add_tag("support").unwrap();

    let SubmitOutcome::Saved(saved) = editor.submit().await.unwrap() else {
        panic!("publish should succeed");
    };
    assert_eq!(editor.state(), EditorState::Closed);
    assert_eq!(saved.tags, vec!["#agent-chat", "support"]);

    // The list refreshed page 0 and shows the new entry first
    let items = app.list.items().await;
    assert_eq!(items.len(), 3);
    assert_eq!(items[0].id, saved.id);

    let mut delete = app.delete_flow(saved.clone());
    delete.request_delete().unwrap();
    assert_eq!(delete.confirm().await.unwrap(), DeleteOutcome::Deleted);
    assert!(app.list.items().await.iter().all(|a| a.id != saved.id));
    assert!(api.get(&saved.id).await.is_none());

    assert_eq!(
        notifier.keys(),
        vec![MessageKey::AppCreated, MessageKey::AppDeleted]
    );
}

#[tokio::test]
async fn app_caller_workflow_is_reported() {
    let api = catalog(0).await;
    api.mark_app_caller_source("ws-router").await;
    let notifier = Arc::new(RecordingNotifier::default());
    let app = build(
        api,
        StaticPermissionService::new("alice"),
        Arc::clone(&notifier),
    );

    let mut editor = app.editor();
    editor.open(OpenRequest::Create(SourceApp {
        id: "ws-router".to_string(),
        name: "Router".to_string(),
        mode: AppMode::AdvancedChat,
    }));
    editor
        .set_field(EditorField::Name("Router".to_string()))
        .unwrap();

    assert!(matches!(
        editor.submit().await.unwrap(),
        SubmitOutcome::Failed(_)
    ));
    assert_eq!(editor.state(), EditorState::Creating);

    let last = notifier.seen.lock().unwrap().last().cloned().unwrap();
    assert_eq!(last.key, MessageKey::AppCreateFailed);
    assert_eq!(last.detail.as_deref(), Some("app_caller_error"));
}

#[tokio::test]
async fn mutation_signals_other_instance_through_flag_file() {
    let tmp = tempfile::tempdir().unwrap();
    let flag_path = tmp.path().join("flags.json");
    let api = catalog(3).await;
    let shared: Arc<dyn MarketAppApi> = api.clone();

    let make = |actor: &str| {
        CatalogAppBuilder::new()
            .api(Arc::clone(&shared))
            .permissions(Arc::new(StaticPermissionService::new(actor)))
            .notifier(Arc::new(RecordingNotifier::default()))
            .flag_store(Arc::new(JsonFileFlagStore::new(&flag_path)))
            .build()
            .unwrap()
    };
    let writer = make("alice");
    let reader = make("bob");
    writer.start().await;
    reader.start().await;

    let target = api.get("e1").await.unwrap();
    let mut editor = writer.editor();
    editor.open(OpenRequest::Edit(target));
    editor
        .set_field(EditorField::Name("Renamed".to_string()))
        .unwrap();
    editor.submit().await.unwrap();

    assert!(!writer.list.poll_cross_view_signal().await);
    assert!(reader.list.poll_cross_view_signal().await);
    assert!(reader
        .list
        .items()
        .await
        .iter()
        .any(|a| a.name == "Renamed"));
    assert!(!reader.list.poll_cross_view_signal().await);
}
