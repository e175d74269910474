//! Abstract HTTP capability used by the fetch clients.
//!
//! The sync engine never talks to `reqwest` directly: it builds an
//! [`OtaRequest`], hands it to an [`HttpTransport`] and classifies the
//! returned [`HttpResponse`]. [`ReqwestTransport`] is the only implementation
//! that performs real network I/O.

mod reqwest_transport;
#[cfg(test)]
pub(crate) mod scripted;

pub use reqwest_transport::ReqwestTransport;

use std::time::Duration;

use async_trait::async_trait;
use ota_strings_types::TransportError;
use url::Url;

/// A GET request ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtaRequest {
    pub url: Url,
    pub headers: Vec<(String, String)>,
}

impl OtaRequest {
    pub fn get(url: Url) -> Self {
        Self { url, headers: Vec::new() }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// Status, headers and decoded body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, headers: Vec::new(), body: body.into() }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// Sends requests on behalf of the fetch clients.
///
/// Implementations report connection failures and timeouts as errors; any
/// HTTP status, including 4xx/5xx, is a successful `send`.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: &OtaRequest, timeout: Duration)
        -> Result<HttpResponse, TransportError>;
}
