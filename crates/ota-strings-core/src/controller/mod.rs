//! Sync controller: bootstrap from cache and run conditional sync cycles.
//!
//! # Cycle
//!
//! ```text
//! Idle ─► FetchingManifest ─┬─► NoChange ─────────────────────┐
//!                           └─► ApplyingLocales ─► persist ───┴─► Done
//! ```
//!
//! Locale fetches in one cycle run concurrently and each one fails on its own;
//! the order in which locales are applied is not guaranteed.
//!
//! # Locking
//!
//! - `cycle` (async mutex) is held for a whole sync cycle or bootstrap, so
//!   concurrent `check_for_updates` calls never interleave their writes.
//! - `state` (sync mutex) guards the ETags and revision; it is only held for
//!   field reads/writes and never across an `.await`. Shutdown is flagged
//!   under it, so a revision is never published after `shutdown` returns.
//!
//! A cycle re-checks the shutdown flag after every suspension point before it
//! touches the lookup, the cache or the revision.


use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::future::join_all;
use ota_strings_types::{
    CachedLocaleBundle, CachedManifest, LocaleBundle, LocaleDescriptor, SyncError, UpdateResult,
};
use parking_lot::Mutex;

use crate::cache::CacheStore;
use crate::config::OtaConfig;
use crate::fetch::{FetchOutcome, LocaleClient, ManifestClient};
use crate::lookup::LookupSnapshot;
use crate::parser::{parse_locale_payload, parse_manifest};
use crate::request_builder::RequestBuilder;
use crate::revision::RevisionPublisher;
use crate::transport::HttpTransport;

pub const MANIFEST_FETCH_FAILED: &str = "Failed to fetch OTA manifest.";
pub const MANIFEST_PARSE_FAILED: &str = "Failed to parse OTA manifest.";
pub const LOCALES_FAILED: &str = "One or more locales failed to update.";
pub const CONTROLLER_SHUT_DOWN: &str = "Sync controller was shut down.";

/// Mutable sync state owned by the controller.
#[derive(Debug, Default)]
struct SyncState {
    manifest_etag: Option<String>,
    locale_etags: HashMap<String, String>,
    revision: i64,
}

/// Result of fetching and decoding one locale.
enum LocaleFetch {
    NoChange,
    Updated { body: String, bundle: LocaleBundle },
}

/// Single owner of sync state; drives manifest and locale fetches and keeps
/// the cache store and lookup snapshot in step.
pub struct SyncController {
    cache_store: Arc<dyn CacheStore>,
    manifest_client: ManifestClient,
    locale_client: LocaleClient,
    lookup: Arc<LookupSnapshot>,
    revision: Arc<RevisionPublisher>,
    cycle: tokio::sync::Mutex<()>,
    state: Mutex<SyncState>,
    shut_down: AtomicBool,
}

impl SyncController {
    pub fn new(
        config: &OtaConfig,
        transport: Arc<dyn HttpTransport>,
        cache_store: Arc<dyn CacheStore>,
        lookup: Arc<LookupSnapshot>,
        revision: Arc<RevisionPublisher>,
    ) -> Self {
        let requests = RequestBuilder::new(config.endpoint.clone(), config.publish_id.clone());
        Self {
            cache_store,
            manifest_client: ManifestClient::new(
                Arc::clone(&transport),
                requests.clone(),
                config.request_timeout,
            ),
            locale_client: LocaleClient::new(transport, requests, config.request_timeout),
            lookup,
            revision,
            cycle: tokio::sync::Mutex::new(()),
            state: Mutex::new(SyncState::default()),
            shut_down: AtomicBool::new(false),
        }
    }

    /// Revision of the last cycle that updated at least one locale.
    pub fn revision(&self) -> i64 {
        self.state.lock().revision
    }

    pub fn manifest_etag(&self) -> Option<String> {
        self.state.lock().manifest_etag.clone()
    }

    pub fn locale_etag(&self, locale_tag: &str) -> Option<String> {
        self.state.lock().locale_etags.get(locale_tag).cloned()
    }

    /// Stop accepting work; results of in-flight fetches are discarded.
    pub fn shutdown(&self) {
        let _state = self.state.lock();
        self.shut_down.store(true, Ordering::SeqCst);
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::SeqCst)
    }

    /// Load persisted manifest and bundles into memory.
    ///
    /// Every step is best-effort: an unparseable manifest leaves the revision
    /// untouched and corrupt bundles are skipped. The lookup snapshot is
    /// replaced in one swap and the resolved revision is published.
    pub async fn bootstrap(&self) {
        let _cycle = self.cycle.lock().await;

        let cached_manifest = self.cache_store.read_manifest().await;
        let cached_locales = self.cache_store.read_all_locale_bundles().await;

        let revision = cached_manifest.as_ref().and_then(|cached| {
            parse_manifest(&cached.body)
                .inspect_err(|e| tracing::warn!(error = %e, "Cached manifest unreadable"))
                .ok()
                .map(|manifest| manifest.revision)
        });

        let mut tables = HashMap::with_capacity(cached_locales.len());
        let mut etags = HashMap::with_capacity(cached_locales.len());
        for bundle in cached_locales {
            match parse_locale_payload(&bundle.payload_json) {
                Ok(values) => {
                    if let Some(etag) = bundle.etag {
                        etags.insert(bundle.locale_tag.clone(), etag);
                    }
                    tables.insert(bundle.locale_tag, values);
                },
                Err(e) => {
                    tracing::warn!(
                        locale = %bundle.locale_tag,
                        error = %e,
                        "Skipping corrupt cached bundle"
                    );
                },
            }
        }

        let locale_count = tables.len();
        let revision = {
            let mut state = self.state.lock();
            if self.is_shut_down() {
                return;
            }
            state.manifest_etag = cached_manifest.and_then(|cached| cached.etag);
            state.locale_etags = etags;
            if let Some(revision) = revision {
                state.revision = revision;
            }
            self.lookup.replace_all(tables);
            self.revision.publish(state.revision);
            state.revision
        };

        tracing::info!(locales = locale_count, revision, "Bootstrapped strings from cache");
    }

    /// Run one sync cycle.
    pub async fn check_for_updates(&self) -> UpdateResult {
        if self.is_shut_down() {
            return UpdateResult::failed(CONTROLLER_SHUT_DOWN);
        }

        let _cycle = self.cycle.lock().await;

        let manifest_etag = self.manifest_etag();
        let outcome = match self.manifest_client.fetch(manifest_etag.as_deref()).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(error = %e, "Manifest update failed");
                return UpdateResult::failed(MANIFEST_FETCH_FAILED);
            },
        };

        if self.is_shut_down() {
            tracing::debug!("Discarding manifest fetched after shutdown");
            return UpdateResult::failed(CONTROLLER_SHUT_DOWN);
        }

        match outcome {
            FetchOutcome::NoChange => {
                tracing::debug!("Manifest not modified");
                UpdateResult::NoChange
            },
            FetchOutcome::Content { body, etag } => self.apply_manifest(body, etag).await,
        }
    }

    async fn apply_manifest(&self, body: String, etag: Option<String>) -> UpdateResult {
        let manifest = match parse_manifest(&body) {
            Ok(manifest) => manifest,
            Err(e) => {
                tracing::warn!(error = %e, "Manifest parsing failed");
                return UpdateResult::failed(MANIFEST_PARSE_FAILED);
            },
        };

        let known_etags = self.state.lock().locale_etags.clone();
        let fetches = manifest.locales.iter().map(|descriptor| {
            let etag = known_etags.get(&descriptor.locale).map(String::as_str);
            async move { (descriptor, self.fetch_locale(descriptor, etag).await) }
        });
        let results = join_all(fetches).await;

        if self.is_shut_down() {
            tracing::debug!("Discarding locale results fetched after shutdown");
            return UpdateResult::failed(CONTROLLER_SHUT_DOWN);
        }

        let mut updated = BTreeSet::new();
        let mut had_failure = false;
        for (descriptor, result) in results {
            if self.is_shut_down() {
                tracing::debug!("Discarding remaining locales after shutdown");
                return UpdateResult::failed(CONTROLLER_SHUT_DOWN);
            }
            match result {
                Ok(LocaleFetch::NoChange) => {
                    tracing::trace!(locale = %descriptor.locale, "Locale not modified");
                },
                Ok(LocaleFetch::Updated { body, bundle }) => {
                    let locale_tag = bundle.locale_tag.clone();
                    if !self.apply_locale(body, bundle).await {
                        return UpdateResult::failed(CONTROLLER_SHUT_DOWN);
                    }
                    updated.insert(locale_tag);
                },
                Err(e) => {
                    tracing::warn!(locale = %descriptor.locale, error = %e, "Locale update failed");
                    had_failure = true;
                },
            }
        }

        if self.is_shut_down() {
            return UpdateResult::failed(CONTROLLER_SHUT_DOWN);
        }
        self.cache_store.write_manifest(&CachedManifest::new(body, etag.clone())).await;

        let advanced = {
            let mut state = self.state.lock();
            if self.is_shut_down() {
                tracing::debug!("Discarding manifest state after shutdown");
                return UpdateResult::failed(CONTROLLER_SHUT_DOWN);
            }
            state.manifest_etag = etag;
            let advanced = !updated.is_empty();
            if advanced {
                state.revision = manifest.revision;
                self.revision.publish(manifest.revision);
            }
            advanced
        };

        if advanced {
            tracing::info!(
                revision = manifest.revision,
                locales = ?updated,
                "Applied OTA string update"
            );
            return UpdateResult::Updated(updated);
        }

        if had_failure {
            return UpdateResult::failed(LOCALES_FAILED);
        }

        UpdateResult::NoChange
    }

    async fn fetch_locale(
        &self,
        descriptor: &LocaleDescriptor,
        etag: Option<&str>,
    ) -> Result<LocaleFetch, SyncError> {
        match self.locale_client.fetch(descriptor, etag).await? {
            FetchOutcome::NoChange => Ok(LocaleFetch::NoChange),
            FetchOutcome::Content { body, etag } => {
                let bundle = LocaleBundle {
                    locale_tag: descriptor.locale.clone(),
                    values: parse_locale_payload(&body)?,
                    etag: etag.or_else(|| descriptor.etag.clone()),
                };
                Ok(LocaleFetch::Updated { body, bundle })
            },
        }
    }

    /// Publish a locale to the lookup snapshot, then persist it.
    ///
    /// Returns `false` without touching anything once shut down.
    async fn apply_locale(&self, body: String, bundle: LocaleBundle) -> bool {
        let LocaleBundle { locale_tag, values, etag } = bundle;
        let key_count = values.len();

        {
            let mut state = self.state.lock();
            if self.is_shut_down() {
                return false;
            }
            self.lookup.set_locale(locale_tag.clone(), values);
            match &etag {
                Some(etag) => state.locale_etags.insert(locale_tag.clone(), etag.clone()),
                None => state.locale_etags.remove(&locale_tag),
            };
        }

        let cached = CachedLocaleBundle::new(locale_tag.clone(), body, etag);
        self.cache_store.write_locale_bundle(&cached).await;
        tracing::debug!(locale = %locale_tag, keys = key_count, "Locale bundle updated");
        true
    }
}
