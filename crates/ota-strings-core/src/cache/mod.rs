//! Durable key-value persistence for the manifest and locale bundles.
//!
//! # Contract
//!
//! - Every operation is independently failure-tolerant: a missing or corrupt
//!   record reads as `None`, a failed write is logged and dropped.
//! - Reads return the last write for the same key (read-your-last-write);
//!   distinct tags are distinct keys.
//! - [`CacheStore::read_all_locale_bundles`] order is unspecified.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  CacheStore                                  │
//! │  ├── manifest        (singleton record)      │
//! │  └── locales/<tag>   (one record per locale) │
//! └──────────────────────────────────────────────┘
//! ```

mod disk;
mod memory;
#[cfg(test)]
pub(crate) mod slow;

pub use disk::DiskCacheStore;
pub use memory::MemoryCacheStore;

use async_trait::async_trait;
use ota_strings_types::{CachedLocaleBundle, CachedManifest};

#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn read_manifest(&self) -> Option<CachedManifest>;
    async fn write_manifest(&self, manifest: &CachedManifest);
    async fn read_locale_bundle(&self, locale_tag: &str) -> Option<CachedLocaleBundle>;
    async fn write_locale_bundle(&self, bundle: &CachedLocaleBundle);
    async fn read_all_locale_bundles(&self) -> Vec<CachedLocaleBundle>;
}

/// File-name-safe form of a locale tag.
///
/// Bytes outside `[A-Za-z0-9_-]` become `%XX`, so distinct tags always map to
/// distinct names and no name starts with a dot.
pub fn encode_locale_tag(locale_tag: &str) -> String {
    let mut encoded = String::with_capacity(locale_tag.len());
    for byte in locale_tag.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'_' | b'-') {
            encoded.push(char::from(byte));
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }
    encoded
}
