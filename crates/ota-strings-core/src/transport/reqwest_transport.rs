//! Production transport over `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use ota_strings_types::TransportError;
use reqwest::Client;

use super::{HttpResponse, HttpTransport, OtaRequest};

/// Connect timeout applied to the shared client; the per-request timeout
/// passed to [`HttpTransport::send`] bounds the whole exchange.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// [`HttpTransport`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, TransportError> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(concat!("ota-strings/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| map_reqwest_error(&e))?;
        Ok(Self { client })
    }

    /// Wrap an existing client, e.g. one configured with a proxy.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(
        &self,
        request: &OtaRequest,
        timeout: Duration,
    ) -> Result<HttpResponse, TransportError> {
        let mut builder = self.client.get(request.url.clone()).timeout(timeout);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let resp = builder.send().await.map_err(|e| map_reqwest_error(&e))?;

        let status = resp.status().as_u16();
        let headers = resp
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value.to_str().ok().map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        let bytes = resp.bytes().await.map_err(|e| map_reqwest_error(&e))?;
        // Non-UTF-8 bytes are replaced, not rejected
        let body = String::from_utf8_lossy(&bytes).into_owned();

        tracing::trace!(url = %request.url, status, bytes = bytes.len(), "HTTP exchange complete");

        Ok(HttpResponse { status, headers, body })
    }
}

fn map_reqwest_error(e: &reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Connection(e.to_string())
    }
}
