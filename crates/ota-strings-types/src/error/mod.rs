//! Typed error definitions for the sync engine.
//!
//! Each sync stage has its own error enum. [`SyncError`] unifies the ones
//! that can occur while a sync cycle runs so fetch and parse code can use
//! `?` freely; only the controller turns it into a host-facing result.

mod config;
mod parse;
mod request;
mod transport;

pub use config::ConfigError;
pub use parse::ParseError;
pub use request::RequestError;
pub use transport::TransportError;

use thiserror::Error;

/// Unified error for a single manifest or locale fetch-and-parse step.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SyncError {
    /// Connection, timeout or unexpected HTTP status
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Payload did not have the expected shape
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// No request could be built for the target
    #[error("Request construction error: {0}")]
    Request(#[from] RequestError),
}
