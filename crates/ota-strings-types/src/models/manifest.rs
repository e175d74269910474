//! Parsed manifest and locale bundle models.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use url::Url;

/// Server-provided index of available locale bundles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Revision number; 0 when the payload carries none
    pub revision: i64,
    /// Locale entries in payload order
    pub locales: Vec<LocaleDescriptor>,
}

/// One entry of the manifest's locale list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleDescriptor {
    /// Locale tag, never empty
    pub locale: String,
    /// ETag advertised by the manifest for this bundle
    pub etag: Option<String>,
    /// Direct bundle location overriding the conventional endpoint
    pub url: Option<Url>,
}

impl LocaleDescriptor {
    /// Descriptor carrying only a tag.
    pub fn tag_only(locale: impl Into<String>) -> Self {
        Self { locale: locale.into(), etag: None, url: None }
    }
}

/// Decoded key -> string table for one locale, with the ETag it is cached under.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocaleBundle {
    pub locale_tag: String,
    pub values: HashMap<String, String>,
    pub etag: Option<String>,
}
