//! Domain models for the OTA strings synchronizer.

mod cache;
mod manifest;
mod policy;
mod result;

pub use cache::{CachedLocaleBundle, CachedManifest};
pub use manifest::{LocaleBundle, LocaleDescriptor, Manifest};
pub use policy::{LogLevel, UpdatePolicy};
pub use result::UpdateResult;
