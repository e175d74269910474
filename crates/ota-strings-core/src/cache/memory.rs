//! Process-local cache store.

use std::collections::HashMap;

use async_trait::async_trait;
use ota_strings_types::{CachedLocaleBundle, CachedManifest};
use parking_lot::RwLock;

use super::CacheStore;

/// [`CacheStore`] that keeps records in memory only.
///
/// Useful for hosts that don't want on-disk persistence and for seeding a
/// runtime with known content.
#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    manifest: RwLock<Option<CachedManifest>>,
    locales: RwLock<HashMap<String, CachedLocaleBundle>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with a manifest and bundles.
    pub fn seeded(
        manifest: Option<CachedManifest>,
        bundles: impl IntoIterator<Item = CachedLocaleBundle>,
    ) -> Self {
        let locales = bundles.into_iter().map(|b| (b.locale_tag.clone(), b)).collect();
        Self { manifest: RwLock::new(manifest), locales: RwLock::new(locales) }
    }

    pub fn locale_count(&self) -> usize {
        self.locales.read().len()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn read_manifest(&self) -> Option<CachedManifest> {
        self.manifest.read().clone()
    }

    async fn write_manifest(&self, manifest: &CachedManifest) {
        *self.manifest.write() = Some(manifest.clone());
    }

    async fn read_locale_bundle(&self, locale_tag: &str) -> Option<CachedLocaleBundle> {
        self.locales.read().get(locale_tag).cloned()
    }

    async fn write_locale_bundle(&self, bundle: &CachedLocaleBundle) {
        self.locales.write().insert(bundle.locale_tag.clone(), bundle.clone());
    }

    async fn read_all_locale_bundles(&self) -> Vec<CachedLocaleBundle> {
        self.locales.read().values().cloned().collect()
    }
}
