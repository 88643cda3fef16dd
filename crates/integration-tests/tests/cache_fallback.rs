//! File-backed cache behaviour when the store is unreachable.
//!
//! Run with: cargo test -p showcase-integration-tests --test cache_fallback

#![allow(clippy::unwrap_used)]

use serde_json::json;
use showcase_core::CloudSettings;
use showcase_core::defaults::default_cases;
use showcase_integration_tests::{MockDocumentStore, READ_KEY, client, public_config, visitor};
use showcase_sync::cache::{CASES_KEY, PRODUCTS_KEY};
use showcase_sync::{FileStore, LocalStore, PublicReadConfig, SyncOrchestrator, SyncStatus};

/// Nothing listens on the discard port in the test environment.
const UNREACHABLE: &str = "http://127.0.0.1:9/b/catalog";

#[tokio::test]
async fn test_last_good_catalog_survives_an_outage() {
    let dir = tempfile::tempdir().unwrap();
    let store = MockDocumentStore::start().await;
    let bin = store.create_bin("catalog").await;
    bin.seed(json!({
        "products": [{"id": "P1", "name": "Cached camera"}],
        "cases": [{"id": "C1", "title": "Cached case"}]
    }));

    // First visit: synced, and the cache on disk is refreshed.
    let mut first = SyncOrchestrator::new(FileStore::new(dir.path()), client(), public_config(&bin));
    assert_eq!(first.hydrate().await, SyncStatus::Synced);
    let expected_products = first.products().to_vec();
    let expected_cases = first.cases().to_vec();

    // Second visit: the store is unreachable.
    let offline = PublicReadConfig::new(CloudSettings::new(UNREACHABLE, READ_KEY));
    let mut second = SyncOrchestrator::new(FileStore::new(dir.path()), client(), offline);
    assert_eq!(second.hydrate().await, SyncStatus::FallbackToCache);
    assert_eq!(second.products(), expected_products.as_slice());
    assert_eq!(second.cases(), expected_cases.as_slice());
}

#[tokio::test]
async fn test_corrupt_cases_file_only_affects_cases() {
    let dir = tempfile::tempdir().unwrap();
    let mut cache = FileStore::new(dir.path());
    cache
        .set(PRODUCTS_KEY, r#"[{"id": "P1", "name": "Cached camera"}]"#)
        .unwrap();
    cache.set(CASES_KEY, "[{\"id\": ").unwrap();

    let store = MockDocumentStore::start().await;
    let missing = store.create_bin("missing").await;

    let mut session = SyncOrchestrator::new(cache, client(), public_config(&missing));
    assert_eq!(session.hydrate().await, SyncStatus::FallbackToCache);

    assert_eq!(session.products().len(), 1);
    assert_eq!(session.products()[0].id.as_str(), "P1");
    assert_eq!(session.cases(), default_cases().as_slice());
}

#[tokio::test]
async fn test_invalid_remote_document_falls_back() {
    let store = MockDocumentStore::start().await;
    let bin = store.create_bin("catalog").await;
    bin.seed(json!({"items": []}));

    let mut reader = visitor(&bin);
    assert_eq!(reader.hydrate().await, SyncStatus::FallbackToCache);
    assert!(!reader.products().is_empty());
}
