use std::sync::Arc;
use std::time::Duration;

use ota_strings_types::{
    CachedLocaleBundle, CachedManifest, ConfigError, LogLevel, UpdatePolicy, UpdateResult,
};

use super::{OtaStrings, NOT_CONFIGURED};
use crate::cache::slow::SlowWriteStore;
use crate::cache::{CacheStore, DiskCacheStore, MemoryCacheStore};
use crate::config::OtaConfig;
use crate::controller::CONTROLLER_SHUT_DOWN;
use crate::transport::scripted::ScriptedTransport;

const MANIFEST: &str = "/sdk/translations/manifest";
const EN: &str = "/sdk/translations/ios/en";

fn manual_config() -> OtaConfig {
    OtaConfig::new("publish-id")
        .with_update_policy(UpdatePolicy::new(false, None))
        .with_log_level(LogLevel::None)
}

async fn configured(
    store: Arc<dyn CacheStore>,
    config: OtaConfig,
) -> (OtaStrings, Arc<ScriptedTransport>) {
    let transport = Arc::new(ScriptedTransport::new());
    let runtime = OtaStrings::new();
    runtime.configure_with_transport(config, Some(store), transport.clone()).await.unwrap();
    (runtime, transport)
}

#[tokio::test]
async fn test_check_before_configure_fails() {
    let runtime = OtaStrings::new();
    let result = runtime.check_for_updates().await;
    assert_eq!(result, UpdateResult::failed(NOT_CONFIGURED));
    assert!(result.error_message().is_some());
    assert!(!runtime.is_configured());
    assert_eq!(runtime.current_revision(), 0);
}

#[tokio::test]
async fn test_empty_publish_id_is_rejected() {
    let runtime = OtaStrings::new();
    let err = runtime
        .configure_with_transport(
            OtaConfig::new("  "),
            Some(Arc::new(MemoryCacheStore::new())),
            Arc::new(ScriptedTransport::new()),
        )
        .await
        .unwrap_err();
    assert_eq!(err, ConfigError::EmptyPublishId);
    assert!(!runtime.is_configured());
}

#[tokio::test]
async fn test_manifest_request_uses_fixed_url_and_publish_id() {
    let (runtime, transport) =
        configured(Arc::new(MemoryCacheStore::new()), manual_config()).await;
    transport.enqueue(MANIFEST, 304, "", None);

    assert_eq!(runtime.check_for_updates().await, UpdateResult::NoChange);

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].url.as_str(),
        "https://rerune.io/api/sdk/translations/manifest?platform=ios"
    );
    assert_eq!(requests[0].header("X-OTA-Publish-Id"), Some("publish-id"));
}

#[tokio::test]
async fn test_etags_from_cache_drive_conditional_requests() {
    let manifest = r#"{"revision":2,"locales":[{"locale":"en","etag":"W/\"en-2\""}]}"#;
    let store = Arc::new(MemoryCacheStore::seeded(
        Some(CachedManifest::new(manifest, Some("W/\"manifest-1\"".to_string()))),
        [CachedLocaleBundle::new("en", r#"{"home_title":"Hello"}"#, Some("W/\"en-1\"".to_string()))],
    ));
    let (runtime, transport) = configured(store, manual_config()).await;
    transport.enqueue(MANIFEST, 200, manifest, Some("W/\"manifest-2\""));
    transport.enqueue(EN, 304, "", None);

    assert_eq!(runtime.current_revision(), 2);
    assert_eq!(runtime.check_for_updates().await, UpdateResult::NoChange);

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].header("If-None-Match"), Some("W/\"manifest-1\""));
    assert_eq!(requests[1].header("If-None-Match"), Some("W/\"en-1\""));
}

#[tokio::test]
async fn test_cache_first_lookup_with_fallback() {
    let store = Arc::new(MemoryCacheStore::seeded(
        None,
        [CachedLocaleBundle::new("en", r#"{"home_title":"Welcome OTA"}"#, None)],
    ));
    let (runtime, transport) = configured(store, manual_config()).await;

    assert_eq!(runtime.lookup_chain("home_title", &["en"]).as_deref(), Some("Welcome OTA"));
    assert_eq!(runtime.lookup("home_title", "en-US").as_deref(), Some("Welcome OTA"));
    assert_eq!(runtime.lookup("home_title", "fr-FR"), None);
    assert_eq!(runtime.lookup("missing", "en"), None);
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_failed_locale_update_reports_failed() {
    let (runtime, transport) =
        configured(Arc::new(MemoryCacheStore::new()), manual_config()).await;
    transport.enqueue(MANIFEST, 200, r#"{"revision":3,"locales":[{"locale":"en"}]}"#, None);
    transport.enqueue(EN, 500, "", None);

    assert!(runtime.check_for_updates().await.is_failed());
    assert_eq!(runtime.current_revision(), 0);
}

#[tokio::test]
async fn test_revision_notification_fires_once_on_update() {
    let (runtime, transport) =
        configured(Arc::new(MemoryCacheStore::new()), manual_config()).await;
    let mut rx = runtime.subscribe();
    transport.enqueue(MANIFEST, 200, r#"{"revision":7,"locales":[{"locale":"en"}]}"#, None);
    transport.enqueue(EN, 200, r#"{"home_title":"Welcome"}"#, None);

    let result = runtime.check_for_updates().await;

    assert!(result.is_updated());
    assert_eq!(result.updated_locales().map(|l| l.len()), Some(1));
    assert_eq!(runtime.lookup("home_title", "en").as_deref(), Some("Welcome"));
    assert_eq!(runtime.current_revision(), 7);
    assert!(rx.has_changed().unwrap());
    assert_eq!(*rx.borrow_and_update(), 7);
    assert!(!rx.has_changed().unwrap());
}

#[tokio::test]
async fn test_on_revision_change_callback() {
    let (runtime, transport) =
        configured(Arc::new(MemoryCacheStore::new()), manual_config()).await;
    let (tx, mut seen) = tokio::sync::mpsc::unbounded_channel();
    let forwarder = runtime.on_revision_change(move |revision| {
        let _ = tx.send(revision);
    });

    transport.enqueue(MANIFEST, 200, r#"{"revision":11,"locales":[{"locale":"en"}]}"#, None);
    transport.enqueue(EN, 200, r#"{"a":"b"}"#, None);
    runtime.check_for_updates().await;

    let revision = tokio::time::timeout(Duration::from_secs(1), seen.recv()).await.unwrap();
    assert_eq!(revision, Some(11));
    forwarder.abort();
}

#[tokio::test]
async fn test_check_on_start_runs_in_background() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.enqueue(MANIFEST, 200, r#"{"revision":5,"locales":[{"locale":"en"}]}"#, None);
    transport.enqueue(EN, 200, r#"{"greeting":"Hi"}"#, None);

    let runtime = OtaStrings::new();
    let config = OtaConfig::new("publish-id").with_log_level(LogLevel::None);
    runtime
        .configure_with_transport(config, Some(Arc::new(MemoryCacheStore::new())), transport.clone())
        .await
        .unwrap();

    let result = runtime.wait_for_startup().await;
    assert!(matches!(result, Some(UpdateResult::Updated(_))));
    assert_eq!(runtime.lookup("greeting", "en").as_deref(), Some("Hi"));
    assert_eq!(runtime.current_revision(), 5);
    assert_eq!(runtime.wait_for_startup().await, None);
}

#[tokio::test(start_paused = true)]
async fn test_periodic_policy_schedules_and_teardown_stops() {
    let transport = Arc::new(ScriptedTransport::new());
    for _ in 0..5 {
        transport.enqueue(MANIFEST, 304, "", None);
    }
    let config = manual_config().with_update_policy(UpdatePolicy::new(false, Some(Duration::from_secs(30))));
    let runtime = OtaStrings::new();
    runtime
        .configure_with_transport(config, Some(Arc::new(MemoryCacheStore::new())), transport.clone())
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_secs(65)).await;
    assert_eq!(transport.requests().len(), 2);

    runtime.teardown();
    tokio::time::sleep(Duration::from_secs(120)).await;
    assert_eq!(transport.requests().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_zero_interval_disables_periodic_sync() {
    let transport = Arc::new(ScriptedTransport::new());
    let config = manual_config().with_update_policy(UpdatePolicy::new(false, Some(Duration::ZERO)));
    let runtime = OtaStrings::new();
    runtime
        .configure_with_transport(config, Some(Arc::new(MemoryCacheStore::new())), transport.clone())
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_secs(3600)).await;
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_teardown_resets_runtime() {
    let store = Arc::new(MemoryCacheStore::seeded(
        Some(CachedManifest::new(r#"{"revision":4}"#, None)),
        [CachedLocaleBundle::new("en", r#"{"a":"1"}"#, None)],
    ));
    let (runtime, _transport) = configured(store, manual_config()).await;
    assert_eq!(runtime.current_revision(), 4);
    assert!(runtime.lookup("a", "en").is_some());

    runtime.teardown();

    assert!(!runtime.is_configured());
    assert_eq!(runtime.current_revision(), 0);
    assert_eq!(runtime.lookup("a", "en"), None);
    assert_eq!(runtime.check_for_updates().await, UpdateResult::failed(NOT_CONFIGURED));
}

#[tokio::test]
async fn test_reconfigure_replaces_previous_state() {
    let first = Arc::new(MemoryCacheStore::seeded(
        None,
        [CachedLocaleBundle::new("en", r#"{"a":"first"}"#, None)],
    ));
    let second = Arc::new(MemoryCacheStore::seeded(
        None,
        [CachedLocaleBundle::new("fr", r#"{"a":"second"}"#, None)],
    ));
    let (runtime, _transport) = configured(first, manual_config()).await;
    assert_eq!(runtime.lookup("a", "en").as_deref(), Some("first"));

    runtime
        .configure_with_transport(manual_config(), Some(second), Arc::new(ScriptedTransport::new()))
        .await
        .unwrap();

    assert_eq!(runtime.lookup("a", "en"), None);
    assert_eq!(runtime.lookup("a", "fr").as_deref(), Some("second"));
}

#[tokio::test]
async fn test_disk_cache_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = r#"{"revision":7,"locales":[{"locale":"en"}]}"#;

    {
        let store = Arc::new(DiskCacheStore::new(dir.path()));
        let (runtime, transport) = configured(store, manual_config()).await;
        transport.enqueue(MANIFEST, 200, manifest, Some("m-7"));
        transport.enqueue(EN, 200, r#"{"home_title":"Welcome"}"#, Some("en-7"));
        assert!(runtime.check_for_updates().await.is_updated());
        runtime.teardown();
    }

    let store = Arc::new(DiskCacheStore::new(dir.path()));
    let (runtime, transport) = configured(store, manual_config()).await;
    assert_eq!(runtime.current_revision(), 7);
    assert_eq!(runtime.lookup("home_title", "en-GB").as_deref(), Some("Welcome"));

    transport.enqueue(MANIFEST, 304, "", None);
    assert_eq!(runtime.check_for_updates().await, UpdateResult::NoChange);
    assert_eq!(transport.requests()[0].header("If-None-Match"), Some("m-7"));
}

#[tokio::test]
async fn test_localized_falls_back_to_default() {
    let runtime = OtaStrings::new();
    assert_eq!(runtime.localized("anything", "Default text"), "Default text");
}

#[tokio::test]
async fn test_clones_share_state() {
    let store = Arc::new(MemoryCacheStore::seeded(
        None,
        [CachedLocaleBundle::new("en", r#"{"a":"1"}"#, None)],
    ));
    let (runtime, _transport) = configured(store, manual_config()).await;
    let handle = runtime.clone();
    assert_eq!(handle.lookup("a", "en").as_deref(), Some("1"));

    handle.teardown();
    assert!(!runtime.is_configured());
}

#[tokio::test(start_paused = true)]
async fn test_teardown_mid_cycle_discards_update() {
    let store = Arc::new(SlowWriteStore::new(MemoryCacheStore::new(), Duration::from_secs(10)));
    let (runtime, transport) = configured(store.clone(), manual_config()).await;
    transport.enqueue(MANIFEST, 200, r#"{"revision":7,"locales":[{"locale":"en"}]}"#, Some("m-7"));
    transport.enqueue(EN, 200, r#"{"home_title":"Welcome"}"#, None);

    let cycle = {
        let runtime = runtime.clone();
        tokio::spawn(async move { runtime.check_for_updates().await })
    };
    tokio::time::sleep(Duration::from_secs(1)).await;
    runtime.teardown();

    assert_eq!(cycle.await.unwrap(), UpdateResult::failed(CONTROLLER_SHUT_DOWN));
    assert_eq!(runtime.current_revision(), 0);
    assert_eq!(runtime.lookup("home_title", "en"), None);
    assert!(store.read_manifest().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_stale_cycle_does_not_override_new_configuration() {
    let slow = Arc::new(SlowWriteStore::new(MemoryCacheStore::new(), Duration::from_secs(10)));
    let (runtime, transport) = configured(slow, manual_config()).await;
    transport.enqueue(MANIFEST, 200, r#"{"revision":7,"locales":[{"locale":"en"}]}"#, None);
    transport.enqueue(EN, 200, r#"{"a":"old"}"#, None);

    let cycle = {
        let runtime = runtime.clone();
        tokio::spawn(async move { runtime.check_for_updates().await })
    };
    tokio::time::sleep(Duration::from_secs(1)).await;

    let fresh = Arc::new(MemoryCacheStore::seeded(
        Some(CachedManifest::new(r#"{"revision":3}"#, None)),
        [CachedLocaleBundle::new("en", r#"{"a":"new"}"#, None)],
    ));
    runtime
        .configure_with_transport(manual_config(), Some(fresh), Arc::new(ScriptedTransport::new()))
        .await
        .unwrap();

    assert!(cycle.await.unwrap().is_failed());
    assert_eq!(runtime.current_revision(), 3);
    assert_eq!(runtime.lookup("a", "en").as_deref(), Some("new"));
}
