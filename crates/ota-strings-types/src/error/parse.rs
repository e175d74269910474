//! Payload parsing errors.

use thiserror::Error;

/// Errors raised while decoding manifest or locale payloads.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    /// Payload is not valid JSON at all
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    /// Manifest root is not a JSON object
    #[error("Invalid manifest: root must be an object")]
    InvalidManifest,

    /// Locale payload root is not a JSON object
    #[error("Invalid locale payload: root must be an object")]
    InvalidLocalePayload,
}

impl ParseError {
    /// Create a JSON error from a serde_json error.
    pub fn from_json_error(e: &serde_json::Error) -> Self {
        Self::InvalidJson(e.to_string())
    }
}
