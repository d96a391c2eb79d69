//! Tests against the real driver.
//!
//! The live tests require a running MongoDB instance.
//! Set MONGODB_URL and run with: cargo test --test mongodb -- --ignored

use std::sync::atomic::Ordering;
use std::sync::Arc;

use chrono::Utc;
use mongodb::bson::{doc, Document};
use mongodb::Client;
use tracing::error;
use tracing_mongo_hook::layer::HookLayer;
use tracing_mongo_hook::{Entry, HookError, Hooker, Level};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

const UNREACHABLE: &str = "mongodb://127.0.0.1:1/?serverSelectionTimeoutMS=200";

#[test]
fn unreachable_server_fails_construction() {
    let result = Hooker::new(UNREACHABLE, "logs", "entries");
    assert!(matches!(result, Err(HookError::Connection(_))));
}

#[test]
fn malformed_url_fails_construction() {
    let result = Hooker::new("not-a-connection-string", "logs", "entries");
    assert!(matches!(result, Err(HookError::Connection(_))));
}

#[tokio::test(flavor = "multi_thread")]
async fn construction_inside_multi_thread_runtime_returns_error() {
    let result = Hooker::new(UNREACHABLE, "logs", "entries");
    assert!(matches!(result, Err(HookError::Connection(_))));
}

#[tokio::test(flavor = "current_thread")]
async fn construction_inside_current_thread_runtime_returns_error() {
    let result = Hooker::new(UNREACHABLE, "logs", "entries");
    assert!(matches!(result, Err(HookError::Connection(_))));
}

#[tokio::test(flavor = "multi_thread")]
async fn fire_inside_multi_thread_runtime_returns_delivery_error() {
    let client = Client::with_uri_str(UNREACHABLE).await.unwrap();
    let hooker = Hooker::from_client(&client, "logs", "entries");

    let result = hooker.fire(&Entry::new(Level::Error, "x"));
    assert!(matches!(result, Err(HookError::Delivery(_))));

    // Still usable after a failure.
    let result = hooker.fire(&Entry::new(Level::Error, "y"));
    assert!(matches!(result, Err(HookError::Delivery(_))));
}

#[tokio::test(flavor = "multi_thread")]
async fn error_macro_inside_runtime_counts_failure() {
    let client = Client::with_uri_str(UNREACHABLE).await.unwrap();
    let layer = HookLayer::new(Hooker::from_client(&client, "logs", "entries"));
    let failed = Arc::clone(&layer.failed_events);
    let subscriber = Registry::default().with(layer);

    tracing::subscriber::with_default(subscriber, || {
        error!(code = 503, "disk full");
    });

    assert_eq!(failed.load(Ordering::Relaxed), 1);
}

fn live_url() -> Option<String> {
    std::env::var("MONGODB_URL").ok()
}

fn test_collection() -> String {
    format!("entries_{}", Utc::now().timestamp_nanos_opt().unwrap_or_default())
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "Requires MongoDB instance"]
async fn fire_inserts_into_collection() {
    let Some(url) = live_url() else {
        eprintln!("Skipping test - MongoDB not available");
        return;
    };
    let collection = test_collection();

    let hooker = Hooker::new(&url, "mongo_hook_test", &collection).unwrap();
    let entry = Entry::new(Level::Error, "disk full").with_field("code", 503);
    hooker.fire(&entry).unwrap();

    let client = Client::with_uri_str(&url).await.unwrap();
    let stored = client
        .database("mongo_hook_test")
        .collection::<Document>(&collection);
    let found = stored
        .find_one(doc! { "Message": "disk full" })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.get_str("Level").ok(), Some("error"));
    assert_eq!(found.get_i64("code").ok(), Some(503));

    stored.drop().await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "Requires MongoDB instance"]
async fn hooker_from_client_outlives_original_handle() {
    let Some(url) = live_url() else {
        eprintln!("Skipping test - MongoDB not available");
        return;
    };
    let collection = test_collection();

    let client = Client::with_uri_str(&url).await.unwrap();
    let hooker = Hooker::from_client(&client, "mongo_hook_test", &collection);
    let stored = client
        .database("mongo_hook_test")
        .collection::<Document>(&collection);
    drop(client);

    hooker.fire(&Entry::new(Level::Info, "still here")).unwrap();

    assert_eq!(stored.count_documents(doc! {}).await.unwrap(), 1);
    stored.drop().await.unwrap();
}
