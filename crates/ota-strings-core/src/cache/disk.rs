//! JSON-file cache store.
//!
//! Layout under the root directory:
//!
//! ```text
//! <root>/manifest.json
//! <root>/locales/<encoded-tag>.json
//! ```
//!
//! Writes go to a temp file that is renamed over the target, so a crash
//! mid-write leaves the previous record intact.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use ota_strings_types::{CachedLocaleBundle, CachedManifest};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;

use super::{encode_locale_tag, CacheStore};

/// Directory name for cache storage.
pub const CACHE_DIR: &str = "ota-strings";
/// Filename for the manifest record.
pub const MANIFEST_FILE: &str = "manifest.json";
/// Directory name for locale bundle records.
pub const LOCALES_DIR: &str = "locales";

const ENV_CACHE_DIR: &str = "OTA_STRINGS_CACHE_DIR";
const RECORD_EXT: &str = "json";
const TEMP_SUFFIX: &str = ".tmp";

/// [`CacheStore`] persisting each record as a JSON file.
#[derive(Debug, Clone)]
pub struct DiskCacheStore {
    root: PathBuf,
}

impl DiskCacheStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store at the default location.
    ///
    /// Priority:
    /// 1. `OTA_STRINGS_CACHE_DIR` environment variable
    /// 2. platform data directory joined with `ota-strings`
    /// 3. system temp directory joined with `ota-strings`
    pub fn at_default_location() -> Self {
        Self::new(default_root())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn manifest_path(&self) -> PathBuf {
        self.root.join(MANIFEST_FILE)
    }

    fn locales_dir(&self) -> PathBuf {
        self.root.join(LOCALES_DIR)
    }

    fn locale_path(&self, locale_tag: &str) -> PathBuf {
        self.locales_dir().join(format!("{}.{}", encode_locale_tag(locale_tag), RECORD_EXT))
    }
}

fn default_root() -> PathBuf {
    if let Ok(custom_dir) = std::env::var(ENV_CACHE_DIR) {
        if !custom_dir.trim().is_empty() {
            return PathBuf::from(custom_dir);
        }
    }
    dirs::data_dir().unwrap_or_else(std::env::temp_dir).join(CACHE_DIR)
}

async fn read_record<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let content = match fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::debug!(path = %path.display(), error = %e, "Cache record unreadable");
            }
            return None;
        },
    };

    match serde_json::from_str(&content) {
        Ok(record) => Some(record),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Ignoring corrupt cache record");
            None
        },
    }
}

async fn write_record<T: Serialize>(path: &Path, record: &T) {
    if let Err(e) = try_write_record(path, record).await {
        tracing::warn!(path = %path.display(), error = %e, "Failed to persist cache record");
    }
}

async fn try_write_record<T: Serialize>(path: &Path, record: &T) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let content = serde_json::to_vec(record)?;
    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(TEMP_SUFFIX);
    let temp_path = PathBuf::from(temp_name);

    if let Err(e) = fs::write(&temp_path, content).await {
        let _ = fs::remove_file(&temp_path).await;
        return Err(e);
    }

    if let Err(e) = fs::rename(&temp_path, path).await {
        let _ = fs::remove_file(&temp_path).await;
        return Err(e);
    }
    Ok(())
}

fn is_record_file(path: &Path) -> bool {
    let hidden = path
        .file_name()
        .and_then(|n| n.to_str())
        .map_or(true, |name| name.starts_with('.'));
    !hidden && path.extension().is_some_and(|ext| ext == RECORD_EXT)
}

#[async_trait]
impl CacheStore for DiskCacheStore {
    async fn read_manifest(&self) -> Option<CachedManifest> {
        read_record(&self.manifest_path()).await
    }

    async fn write_manifest(&self, manifest: &CachedManifest) {
        write_record(&self.manifest_path(), manifest).await;
    }

    async fn read_locale_bundle(&self, locale_tag: &str) -> Option<CachedLocaleBundle> {
        read_record(&self.locale_path(locale_tag)).await
    }

    async fn write_locale_bundle(&self, bundle: &CachedLocaleBundle) {
        write_record(&self.locale_path(&bundle.locale_tag), bundle).await;
    }

    async fn read_all_locale_bundles(&self) -> Vec<CachedLocaleBundle> {
        let mut entries = match fs::read_dir(self.locales_dir()).await {
            Ok(entries) => entries,
            Err(_) => return Vec::new(),
        };

        let mut bundles = Vec::new();
        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    tracing::debug!(error = %e, "Stopped enumerating cached locales");
                    break;
                },
            };

            let path = entry.path();
            if !is_record_file(&path) {
                continue;
            }
            if let Some(bundle) = read_record::<CachedLocaleBundle>(&path).await {
                bundles.push(bundle);
            }
        }
        bundles
    }
}
