//! Transport-level errors.

use thiserror::Error;

/// Errors that can occur while issuing a request or classifying its response.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// Failed to establish a connection or read the response.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Request did not complete within the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// Server answered with a status other than 200 or 304.
    #[error("Unexpected HTTP status: {0}")]
    BadStatus(u16),
}
