//! Conditional-GET request construction for manifest and locale fetches.

use ota_strings_types::{LocaleDescriptor, RequestError};
use url::Url;

use crate::config::EndpointConfig;
use crate::transport::OtaRequest;

/// Header carrying the publish identifier.
pub const X_OTA_PUBLISH_ID: &str = "X-OTA-Publish-Id";
/// Conditional request header carrying the last known ETag.
pub const IF_NONE_MATCH: &str = "If-None-Match";

/// Builds requests for one publish id against one endpoint.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    endpoint: EndpointConfig,
    publish_id: String,
}

impl RequestBuilder {
    pub fn new(endpoint: EndpointConfig, publish_id: impl Into<String>) -> Self {
        Self { endpoint, publish_id: publish_id.into() }
    }

    /// `GET <host>/sdk/translations/manifest?platform=<platform>`.
    pub fn manifest_request(&self, etag: Option<&str>) -> Result<OtaRequest, RequestError> {
        let mut url = self
            .endpoint_url(&["sdk", "translations", "manifest"])
            .ok_or_else(|| RequestError::InvalidUrl(self.endpoint.host.clone()))?;
        url.query_pairs_mut().append_pair("platform", &self.endpoint.platform);

        Ok(self.conditional(url, etag))
    }

    /// Request for one locale bundle; the descriptor URL wins over
    /// `<host>/sdk/translations/<platform>/<locale>`.
    pub fn locale_request(
        &self,
        descriptor: &LocaleDescriptor,
        etag: Option<&str>,
    ) -> Result<OtaRequest, RequestError> {
        let url = match &descriptor.url {
            Some(url) => url.clone(),
            None => {
                let segments =
                    ["sdk", "translations", self.endpoint.platform.as_str(), descriptor.locale.as_str()];
                self.endpoint_url(&segments).ok_or_else(|| RequestError::UnresolvableLocaleUrl {
                    locale: descriptor.locale.clone(),
                })?
            },
        };

        Ok(self.conditional(url, etag))
    }

    fn endpoint_url(&self, segments: &[&str]) -> Option<Url> {
        let mut url = Url::parse(&self.endpoint.host).ok()?;
        url.set_query(None);
        url.path_segments_mut().ok()?.pop_if_empty().extend(segments);
        Some(url)
    }

    fn conditional(&self, url: Url, etag: Option<&str>) -> OtaRequest {
        let request = OtaRequest::get(url).with_header(X_OTA_PUBLISH_ID, self.publish_id.as_str());
        match etag {
            Some(etag) => request.with_header(IF_NONE_MATCH, etag),
            None => request,
        }
    }
}
