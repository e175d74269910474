//! Manifest and locale fetch clients.
//!
//! Both clients send a conditional GET through the shared transport and
//! classify the response: 304 is [`FetchOutcome::NoChange`], 200 is
//! [`FetchOutcome::Content`], anything else is `TransportError::BadStatus`.
//! Transport failures propagate unchanged.

use std::sync::Arc;
use std::time::Duration;

use ota_strings_types::{LocaleDescriptor, SyncError, TransportError};

use crate::request_builder::RequestBuilder;
use crate::transport::{HttpResponse, HttpTransport, OtaRequest};

const STATUS_OK: u16 = 200;
const STATUS_NOT_MODIFIED: u16 = 304;
const ETAG: &str = "ETag";

/// Classified result of a successful exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Server confirmed the cached ETag is current
    NoChange,
    /// New payload with the response `ETag` header, if any
    Content { body: String, etag: Option<String> },
}

/// Send `request` and classify the response status.
async fn fetch(
    transport: &dyn HttpTransport,
    request: &OtaRequest,
    timeout: Duration,
) -> Result<FetchOutcome, TransportError> {
    let response = transport.send(request, timeout).await?;
    classify(response)
}

fn classify(response: HttpResponse) -> Result<FetchOutcome, TransportError> {
    match response.status {
        STATUS_NOT_MODIFIED => Ok(FetchOutcome::NoChange),
        STATUS_OK => {
            let etag = response.header(ETAG).map(str::to_string);
            Ok(FetchOutcome::Content { body: response.body, etag })
        },
        status => Err(TransportError::BadStatus(status)),
    }
}

/// Fetches the manifest for one publish id.
#[derive(Clone)]
pub struct ManifestClient {
    transport: Arc<dyn HttpTransport>,
    requests: RequestBuilder,
    timeout: Duration,
}

impl ManifestClient {
    pub fn new(transport: Arc<dyn HttpTransport>, requests: RequestBuilder, timeout: Duration) -> Self {
        Self { transport, requests, timeout }
    }

    pub async fn fetch(&self, etag: Option<&str>) -> Result<FetchOutcome, SyncError> {
        let request = self.requests.manifest_request(etag)?;
        tracing::debug!(url = %request.url, conditional = etag.is_some(), "Fetching manifest");
        Ok(fetch(self.transport.as_ref(), &request, self.timeout).await?)
    }
}

/// Fetches individual locale bundles.
#[derive(Clone)]
pub struct LocaleClient {
    transport: Arc<dyn HttpTransport>,
    requests: RequestBuilder,
    timeout: Duration,
}

impl LocaleClient {
    pub fn new(transport: Arc<dyn HttpTransport>, requests: RequestBuilder, timeout: Duration) -> Self {
        Self { transport, requests, timeout }
    }

    pub async fn fetch(
        &self,
        descriptor: &LocaleDescriptor,
        etag: Option<&str>,
    ) -> Result<FetchOutcome, SyncError> {
        let request = self.requests.locale_request(descriptor, etag)?;
        tracing::debug!(
            locale = %descriptor.locale,
            url = %request.url,
            conditional = etag.is_some(),
            "Fetching locale bundle"
        );
        Ok(fetch(self.transport.as_ref(), &request, self.timeout).await?)
    }
}
