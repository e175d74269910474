//! Host-facing runtime.
//!
//! [`OtaStrings`] is an explicitly constructed service object: the host
//! creates one, configures it, and passes clones of it to whatever needs
//! string lookups. Clones share the same state.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │  OtaStrings                                           │
//! │  ├── lookup: LookupSnapshot      (read on every call) │
//! │  ├── revision: RevisionPublisher (watch broadcast)    │
//! │  └── active: Option<ActiveRuntime>                    │
//! │        ├── controller: SyncController                 │
//! │        ├── periodic: PeriodicSync                     │
//! │        └── startup: check-on-start task               │
//! └───────────────────────────────────────────────────────┘
//! ```

#[cfg(test)]
mod tests;

use std::sync::Arc;

use ota_strings_types::{ConfigError, UpdateResult};
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::cache::{CacheStore, DiskCacheStore};
use crate::config::OtaConfig;
use crate::controller::SyncController;
use crate::locale_chain::{preferred_chain, resolve_chain};
use crate::logger;
use crate::lookup::LookupSnapshot;
use crate::revision::RevisionPublisher;
use crate::scheduler::PeriodicSync;
use crate::transport::{HttpTransport, ReqwestTransport};

pub const NOT_CONFIGURED: &str =
    "OtaStrings::configure(...) must be called before check_for_updates().";

/// Everything that exists only between `configure` and `teardown`.
struct ActiveRuntime {
    controller: Arc<SyncController>,
    periodic: Option<PeriodicSync>,
    startup: Option<JoinHandle<UpdateResult>>,
}

impl Drop for ActiveRuntime {
    fn drop(&mut self) {
        if let Some(periodic) = &self.periodic {
            periodic.stop();
        }
        self.controller.shutdown();
    }
}

struct RuntimeInner {
    lookup: Arc<LookupSnapshot>,
    revision: Arc<RevisionPublisher>,
    active: Mutex<Option<ActiveRuntime>>,
}

/// OTA strings runtime: sync lifecycle plus fallback-aware lookups.
#[derive(Clone)]
pub struct OtaStrings {
    inner: Arc<RuntimeInner>,
}

impl Default for OtaStrings {
    fn default() -> Self {
        Self::new()
    }
}

impl OtaStrings {
    /// Unconfigured runtime: revision 0, no strings.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RuntimeInner {
                lookup: Arc::new(LookupSnapshot::new()),
                revision: Arc::new(RevisionPublisher::new()),
                active: Mutex::new(None),
            }),
        }
    }

    /// Configure with the production HTTP transport.
    ///
    /// `cache_store` defaults to a [`DiskCacheStore`] at its default location.
    pub async fn configure(
        &self,
        config: OtaConfig,
        cache_store: Option<Arc<dyn CacheStore>>,
    ) -> Result<(), ConfigError> {
        let transport = ReqwestTransport::new().map_err(|e| ConfigError::ValidationError {
            field: "transport".to_string(),
            message: e.to_string(),
        })?;
        self.configure_with_transport(config, cache_store, Arc::new(transport)).await
    }

    /// Configure with an explicit transport.
    ///
    /// Replaces any previous configuration, bootstraps from the cache before
    /// returning, then starts the check-on-start sync and the periodic
    /// scheduler as the update policy asks.
    pub async fn configure_with_transport(
        &self,
        config: OtaConfig,
        cache_store: Option<Arc<dyn CacheStore>>,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<(), ConfigError> {
        let config = config.validated()?;
        logger::init(config.log_level);

        // Stop the previous controller before a new one touches the lookup
        drop(self.inner.active.lock().take());

        let cache_store: Arc<dyn CacheStore> =
            cache_store.unwrap_or_else(|| Arc::new(DiskCacheStore::at_default_location()));
        let controller = Arc::new(SyncController::new(
            &config,
            transport,
            cache_store,
            Arc::clone(&self.inner.lookup),
            Arc::clone(&self.inner.revision),
        ));

        controller.bootstrap().await;

        let policy = config.update_policy;
        let startup = policy.check_on_start.then(|| {
            let controller = Arc::clone(&controller);
            tokio::spawn(async move { controller.check_for_updates().await })
        });
        let periodic = policy
            .effective_interval()
            .map(|interval| PeriodicSync::start(Arc::clone(&controller), interval));

        tracing::info!(
            publish_id = %config.publish_id,
            check_on_start = policy.check_on_start,
            periodic = periodic.is_some(),
            "OTA strings configured"
        );

        let previous =
            self.inner.active.lock().replace(ActiveRuntime { controller, periodic, startup });
        drop(previous);
        Ok(())
    }

    pub fn is_configured(&self) -> bool {
        self.inner.active.lock().is_some()
    }

    /// Run one sync cycle now.
    pub async fn check_for_updates(&self) -> UpdateResult {
        let controller = self.inner.active.lock().as_ref().map(|a| Arc::clone(&a.controller));
        match controller {
            Some(controller) => controller.check_for_updates().await,
            None => UpdateResult::failed(NOT_CONFIGURED),
        }
    }

    /// Wait for the check-on-start sync, if one was started and not yet awaited.
    pub async fn wait_for_startup(&self) -> Option<UpdateResult> {
        let startup = self.inner.active.lock().as_mut().and_then(|a| a.startup.take())?;
        match startup.await {
            Ok(result) => Some(result),
            Err(e) => {
                tracing::warn!(error = %e, "Startup sync task did not complete");
                None
            },
        }
    }

    /// Look up `key` along the fallback chain of `locale_tag`.
    pub fn lookup(&self, key: &str, locale_tag: &str) -> Option<String> {
        self.inner.lookup.value(key, &resolve_chain(locale_tag))
    }

    /// Look up `key` along an explicit chain.
    pub fn lookup_chain<S: AsRef<str>>(&self, key: &str, chain: &[S]) -> Option<String> {
        self.inner.lookup.value(key, chain)
    }

    /// Look up `key` for the process locale, falling back to `default`.
    pub fn localized(&self, key: &str, default: &str) -> String {
        self.inner
            .lookup
            .value(key, &preferred_chain())
            .unwrap_or_else(|| default.to_string())
    }

    pub fn current_revision(&self) -> i64 {
        self.inner.revision.current()
    }

    /// Receiver notified on every revision publication, latest value only.
    pub fn subscribe(&self) -> watch::Receiver<i64> {
        self.inner.revision.subscribe()
    }

    /// Invoke `callback` with each newly published revision.
    ///
    /// The forwarding task ends when every handle to this runtime is dropped;
    /// abort the returned handle to stop it earlier.
    pub fn on_revision_change<F>(&self, callback: F) -> JoinHandle<()>
    where
        F: Fn(i64) + Send + 'static,
    {
        let mut rx = self.subscribe();
        tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let revision = *rx.borrow_and_update();
                callback(revision);
            }
        })
    }

    /// Stop syncing and reset to the unconfigured state.
    ///
    /// The periodic scheduler stops before its next tick; a cycle already in
    /// flight runs to completion but its results are discarded.
    pub fn teardown(&self) {
        let active = self.inner.active.lock().take();
        if active.is_none() {
            return;
        }
        drop(active);
        self.inner.lookup.clear();
        self.inner.revision.publish(0);
        tracing::info!("OTA strings torn down");
    }
}
