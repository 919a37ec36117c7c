//! Registry behavior: caching, metrics, provider registration.

mod support;

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use yogi::YogiError;
use yogi::cache::ResponseCache;
use yogi::metrics::MetricsSink;
use yogi::registry::ModelRegistry;

use support::StubProvider;

fn registry_with(provider: StubProvider) -> (ModelRegistry, Arc<StubProvider>) {
    let provider = Arc::new(provider);
    let registry = ModelRegistry::default();
    registry
        .register_provider(provider.clone())
        .expect("registration");
    (registry, provider)
}

#[tokio::test]
async fn second_fetch_within_ttl_is_a_cache_hit() {
    let (registry, stub) = registry_with(StubProvider::named("test"));

    let first = registry.get_model("test", "m1").await.unwrap();
    let second = registry.get_model("test", "m1").await.unwrap();

    assert_eq!(stub.fetches.load(Ordering::SeqCst), 1);
    assert_eq!(first, second);
    assert_eq!(first.name.as_deref(), Some("Model One"));
}

#[tokio::test]
async fn expired_entries_are_refetched() {
    let cache = ResponseCache::new(Duration::from_millis(30));
    let registry = ModelRegistry::new(cache, MetricsSink::new());
    let stub = Arc::new(StubProvider::named("test"));
    registry.register_provider(stub.clone()).unwrap();

    registry.get_model("test", "m1").await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    registry.get_model("test", "m1").await.unwrap();

    assert_eq!(stub.fetches.load(Ordering::SeqCst), 2);

    // the refetch rewrote the entry with a fresh timestamp
    registry.get_model("test", "m1").await.unwrap();
    assert_eq!(stub.fetches.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn reregistering_a_name_replaces_the_provider() {
    let (registry, _old) = registry_with(StubProvider::named("test"));
    registry.get_model("test", "m1").await.unwrap();

    let replacement = Arc::new(StubProvider::named("test").with_model_name("Replacement"));
    registry.register_provider(replacement.clone()).unwrap();

    // cached entries from the old adapter are invalidated by hand
    registry.clear_cache().unwrap();
    let model = registry.get_model("test", "m1").await.unwrap();
    assert_eq!(model.name.as_deref(), Some("Replacement"));
    assert_eq!(replacement.fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn predictions_are_never_cached() {
    let (registry, stub) = registry_with(StubProvider::named("test"));
    let input = serde_json::json!({ "prompt": "test" });

    let first = registry
        .run_prediction("test", "m1", "v1", input.clone())
        .await
        .unwrap();
    let second = registry
        .run_prediction("test", "m1", "v1", input)
        .await
        .unwrap();

    assert_eq!(stub.prediction_calls.load(Ordering::SeqCst), 2);
    assert_eq!(first, second);
}

#[tokio::test]
async fn unknown_provider_fails_before_any_upstream_call() {
    let (registry, stub) = registry_with(StubProvider::named("test"));

    let err = registry.get_model("nonexistent", "m1").await.unwrap_err();
    assert!(matches!(err, YogiError::ProviderNotFound(_)));
    assert_eq!(err.to_string(), "Model provider 'nonexistent' not found");

    let err = registry
        .run_prediction("nonexistent", "m1", "v1", serde_json::json!({}))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "PROVIDER_NOT_FOUND");

    assert_eq!(stub.fetches.load(Ordering::SeqCst), 0);
    assert_eq!(stub.prediction_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn metrics_track_successes_and_failures_separately() {
    let (registry, _stub) = registry_with(StubProvider::named("test").with_failing_id("boom"));

    registry.get_model("test", "m1").await.unwrap();
    registry.get_model("test", "m2").await.unwrap();
    for _ in 0..3 {
        // failures are not cached, so each attempt reaches the adapter
        registry.get_model("test", "boom").await.unwrap_err();
    }
    registry
        .run_prediction("test", "m1", "v1", serde_json::json!({}))
        .await
        .unwrap();

    let metrics = registry.metrics().unwrap();
    assert_eq!(metrics.get("test_model_fetches"), Some(&2));
    assert_eq!(metrics.get("test_model_errors"), Some(&3));
    assert_eq!(metrics.get("test_predictions"), Some(&1));
    assert_eq!(metrics.get("test_prediction_errors"), None);
}

#[tokio::test]
async fn model_lists_are_cached_per_query() {
    let (registry, stub) = registry_with(StubProvider::named("test"));

    registry.get_models("test", None).await.unwrap();
    registry.get_models("test", None).await.unwrap();
    assert_eq!(stub.fetches.load(Ordering::SeqCst), 1);

    // a different query is a different cache key
    registry.get_models("test", Some("vision")).await.unwrap();
    assert_eq!(stub.fetches.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn clear_cache_forces_a_refetch() {
    let (registry, stub) = registry_with(StubProvider::named("test"));

    registry.get_model_versions("test", "m1").await.unwrap();
    registry.get_model_versions("test", "m1").await.unwrap();
    assert_eq!(stub.fetches.load(Ordering::SeqCst), 1);

    registry.clear_cache().unwrap();
    let versions = registry.get_model_versions("test", "m1").await.unwrap();
    assert_eq!(stub.fetches.load(Ordering::SeqCst), 2);
    assert_eq!(versions[0].id, "v1");
}

#[tokio::test]
async fn provider_lookup_is_exposed_for_introspection() {
    let (registry, _stub) = registry_with(StubProvider::named("test"));
    assert!(registry.provider("test").is_ok());
    assert!(registry.provider("other").is_err());
    assert_eq!(registry.provider_names().unwrap(), vec!["test".to_string()]);
}
