//! Records persisted by a cache store.
//!
//! Both records keep the raw payload text rather than the parsed structure,
//! so a later parser can reinterpret historical payloads.

use serde::{Deserialize, Serialize};

/// Persisted manifest: raw body plus the ETag it was served with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedManifest {
    pub body: String,
    pub etag: Option<String>,
}

impl CachedManifest {
    pub fn new(body: impl Into<String>, etag: Option<String>) -> Self {
        Self { body: body.into(), etag }
    }
}

/// Persisted locale bundle keyed by its locale tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedLocaleBundle {
    pub locale_tag: String,
    pub payload_json: String,
    pub etag: Option<String>,
}

impl CachedLocaleBundle {
    pub fn new(
        locale_tag: impl Into<String>,
        payload_json: impl Into<String>,
        etag: Option<String>,
    ) -> Self {
        Self { locale_tag: locale_tag.into(), payload_json: payload_json.into(), etag }
    }
}
