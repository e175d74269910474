//! # OTA Strings Core
//!
//! Over-the-air string synchronization: fetches a manifest and per-locale
//! string bundles with conditional GETs, persists them to a cache store and
//! serves fallback-aware lookups from an in-memory snapshot.
//!
//! ## Architecture
//!
//! ```text
//! ota-strings-core/src/
//! ├── runtime/           # OtaStrings: configure / lookup / teardown
//! ├── controller/        # SyncController: one sync cycle at a time
//! ├── scheduler.rs       # Periodic check_for_updates
//! ├── fetch.rs           # Manifest + locale conditional fetch
//! ├── request_builder.rs # URLs and headers
//! ├── transport/         # HttpTransport trait, reqwest implementation
//! ├── parser/            # Tolerant manifest and payload parsing
//! ├── cache/             # CacheStore trait, disk and memory stores
//! ├── lookup.rs          # LookupSnapshot (hot read path)
//! ├── locale_chain.rs    # "pt-BR" -> ["pt-BR", "pt"]
//! ├── revision.rs        # Revision broadcast
//! ├── config.rs          # OtaConfig: file, env, validation
//! └── logger.rs          # tracing subscriber setup
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use ota_strings_core::{OtaConfig, OtaStrings};
//!
//! # async fn run() -> Result<(), ota_strings_core::ConfigError> {
//! let strings = OtaStrings::new();
//! strings.configure(OtaConfig::new("my-publish-id"), None).await?;
//! let title = strings.localized("home_title", "Home");
//! # let _ = title;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod cache;
pub mod config;
pub mod controller;
pub mod fetch;
pub mod locale_chain;
pub mod logger;
pub mod lookup;
pub mod parser;
pub mod request_builder;
pub mod revision;
pub mod runtime;
pub mod scheduler;
pub mod transport;

pub use cache::{CacheStore, DiskCacheStore, MemoryCacheStore};
pub use config::{EndpointConfig, OtaConfig};
pub use controller::SyncController;
pub use locale_chain::{preferred_chain, resolve_chain};
pub use lookup::LookupSnapshot;
pub use revision::RevisionPublisher;
pub use runtime::OtaStrings;
pub use scheduler::PeriodicSync;
pub use transport::{HttpResponse, HttpTransport, OtaRequest, ReqwestTransport};

pub use ota_strings_types::{
    CachedLocaleBundle, CachedManifest, ConfigError, LocaleBundle, LocaleDescriptor, LogLevel,
    Manifest, ParseError, RequestError, SyncError, TransportError, UpdatePolicy, UpdateResult,
};
