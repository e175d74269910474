//! # OTA Strings Types
//!
//! Domain models and error definitions for the over-the-air strings
//! synchronizer.
//!
//! - **`error`** - Typed error hierarchy for parsing, transport, request
//!   construction and configuration
//! - **`models`** - Manifest, locale bundles, persisted cache records,
//!   update policy and sync results
//!
//! ## Architecture Role
//!
//! `ota-strings-types` sits at the bottom of the dependency graph:
//!
//! ```text
//!        ota-strings-types (this crate)
//!                 │
//!                 ▼
//!         ota-strings-core
//!                 │
//!                 ▼
//!           host application
//! ```
//!
//! Persisted records are serde-serializable; everything is `Clone` so it can
//! cross async task boundaries freely.

pub mod error;
pub mod models;

// Re-export error types for convenience
pub use error::{ConfigError, ParseError, RequestError, SyncError, TransportError};

// Re-export core model types
pub use models::{
    CachedLocaleBundle, CachedManifest, LocaleBundle, LocaleDescriptor, LogLevel, Manifest,
    UpdatePolicy, UpdateResult,
};
