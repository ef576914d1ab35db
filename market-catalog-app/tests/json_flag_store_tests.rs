#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
//! Integration tests for `JsonFileFlagStore`.

use std::sync::Arc;

use market_catalog_app::adapters::JsonFileFlagStore;
use market_catalog_core::error::CoreError;
use market_catalog_core::traits::FlagStore;

#[tokio::test]
async fn missing_file_reads_as_empty() {
    let tmp = tempfile::tempdir().unwrap();
    let store = JsonFileFlagStore::new(tmp.path().join("flags.json"));
    assert_eq!(store.get("k").await.unwrap(), None);
    store.remove("k").await.unwrap();
    assert!(!store.path().exists());
}

#[tokio::test]
async fn values_persist_across_instances() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("nested").join("flags.json");

    let first = JsonFileFlagStore::new(&path);
    first.set("a", "1").await.unwrap();
    first.set("b", r#"{"timestampMs":1,"origin":"x"}"#).await.unwrap();

    let second = JsonFileFlagStore::new(&path);
    assert_eq!(second.get("a").await.unwrap().as_deref(), Some("1"));
    assert_eq!(
        second.get("b").await.unwrap().as_deref(),
        Some(r#"{"timestampMs":1,"origin":"x"}"#)
    );

    second.remove("a").await.unwrap();
    assert_eq!(first.get("a").await.unwrap(), None);
    assert!(first.get("b").await.unwrap().is_some());
}

#[tokio::test]
async fn corrupt_file_is_storage_error() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("flags.json");
    tokio::fs::write(&path, "{broken").await.unwrap();

    let store = JsonFileFlagStore::new(&path);
    assert!(matches!(
        store.get("k").await,
        Err(CoreError::StorageError(_))
    ));
}

#[tokio::test]
async fn concurrent_writes_keep_every_key() {
    let tmp = tempfile::tempdir().unwrap();
    let store = Arc::new(JsonFileFlagStore::new(tmp.path().join("flags.json")));

    let writes = (0..8).map(|i| {
        let store = Arc::clone(&store);
        async move { store.set(&format!("k{i}"), "v").await }
    });
    for result in futures::future::join_all(writes).await {
        result.unwrap();
    }

    for i in 0..8 {
        assert!(store.get(&format!("k{i}")).await.unwrap().is_some());
    }
}
