//! Memory store whose locale writes stall, for exercising teardown mid-cycle.

use std::time::Duration;

use async_trait::async_trait;
use ota_strings_types::{CachedLocaleBundle, CachedManifest};

use super::{CacheStore, MemoryCacheStore};

pub(crate) struct SlowWriteStore {
    inner: MemoryCacheStore,
    write_delay: Duration,
}

impl SlowWriteStore {
    pub(crate) fn new(inner: MemoryCacheStore, write_delay: Duration) -> Self {
        Self { inner, write_delay }
    }
}

#[async_trait]
impl CacheStore for SlowWriteStore {
    async fn read_manifest(&self) -> Option<CachedManifest> {
        self.inner.read_manifest().await
    }

    async fn write_manifest(&self, manifest: &CachedManifest) {
        self.inner.write_manifest(manifest).await;
    }

    async fn read_locale_bundle(&self, locale_tag: &str) -> Option<CachedLocaleBundle> {
        self.inner.read_locale_bundle(locale_tag).await
    }

    async fn write_locale_bundle(&self, bundle: &CachedLocaleBundle) {
        tokio::time::sleep(self.write_delay).await;
        self.inner.write_locale_bundle(bundle).await;
    }

    async fn read_all_locale_bundles(&self) -> Vec<CachedLocaleBundle> {
        self.inner.read_all_locale_bundles().await
    }
}
