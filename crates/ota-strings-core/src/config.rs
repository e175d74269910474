//! Runtime configuration.
//!
//! [`OtaConfig`] is what `OtaStrings::configure` consumes. It can be built in
//! code, loaded from a JSON file ([`OtaConfig::load`]) and adjusted from the
//! environment ([`OtaConfig::apply_env_overrides`]).

use std::fs;
use std::path::Path;
use std::time::Duration;

use ota_strings_types::{ConfigError, LogLevel, UpdatePolicy};
use serde::Deserialize;
use url::Url;

/// Default API host serving manifests and locale bundles.
pub const DEFAULT_HOST: &str = "https://rerune.io/api";
/// Default platform qualifier for manifest and locale endpoints.
pub const DEFAULT_PLATFORM: &str = "ios";
/// Default timeout for each manifest or locale request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const ENV_PUBLISH_ID: &str = "OTA_STRINGS_PUBLISH_ID";
const ENV_HOST: &str = "OTA_STRINGS_HOST";
const ENV_PLATFORM: &str = "OTA_STRINGS_PLATFORM";

/// Where manifests and bundles are fetched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    /// Base URL; endpoint paths are appended to it
    pub host: String,
    /// Platform segment of the endpoint paths
    pub platform: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self { host: DEFAULT_HOST.to_string(), platform: DEFAULT_PLATFORM.to_string() }
    }
}

/// Full runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtaConfig {
    /// Publish identifier sent as `X-OTA-Publish-Id`
    pub publish_id: String,
    pub update_policy: UpdatePolicy,
    pub request_timeout: Duration,
    pub log_level: LogLevel,
    pub endpoint: EndpointConfig,
}

impl OtaConfig {
    pub fn new(publish_id: impl Into<String>) -> Self {
        Self {
            publish_id: publish_id.into(),
            update_policy: UpdatePolicy::default(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            log_level: LogLevel::default(),
            endpoint: EndpointConfig::default(),
        }
    }

    pub fn with_update_policy(mut self, policy: UpdatePolicy) -> Self {
        self.update_policy = policy;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    pub fn with_endpoint(mut self, host: impl Into<String>, platform: impl Into<String>) -> Self {
        self.endpoint = EndpointConfig { host: host.into(), platform: platform.into() };
        self
    }

    /// Load configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound { path: path.display().to_string() });
        }
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::ParseError { message: e.to_string() })?;
        Self::from_json(&content)
    }

    /// Parse the JSON file form.
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let file: OtaConfigFile =
            serde_json::from_str(content).map_err(|e| ConfigError::from_json_error(&e))?;
        Ok(file.into())
    }

    /// Override fields from `OTA_STRINGS_*` environment variables.
    pub fn apply_env_overrides(mut self) -> Self {
        if let Some(id) = env_value(ENV_PUBLISH_ID) {
            self.publish_id = id;
        }
        if let Some(host) = env_value(ENV_HOST) {
            self.endpoint.host = host;
        }
        if let Some(platform) = env_value(ENV_PLATFORM) {
            self.endpoint.platform = platform;
        }
        self
    }

    /// Trim the publish id and check the endpoint, returning the normalized config.
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        let trimmed = self.publish_id.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::EmptyPublishId);
        }
        self.publish_id = trimmed.to_string();

        let host = Url::parse(&self.endpoint.host).map_err(|e| ConfigError::ValidationError {
            field: "host".to_string(),
            message: e.to_string(),
        })?;
        if host.cannot_be_a_base() {
            return Err(ConfigError::ValidationError {
                field: "host".to_string(),
                message: "host must be a hierarchical URL".to_string(),
            });
        }

        if self.endpoint.platform.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: "platform".to_string(),
                message: "platform must not be empty".to_string(),
            });
        }

        if self.request_timeout.is_zero() {
            return Err(ConfigError::ValidationError {
                field: "request_timeout".to_string(),
                message: "timeout must be positive".to_string(),
            });
        }

        Ok(self)
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// On-disk JSON form of [`OtaConfig`].
#[derive(Debug, Clone, Deserialize)]
pub struct OtaConfigFile {
    pub publish_id: String,
    #[serde(default = "default_check_on_start")]
    pub check_on_start: bool,
    #[serde(default)]
    pub periodic_interval_secs: Option<u64>,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub log_level: LogLevel,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
}

fn default_check_on_start() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT.as_secs()
}

impl From<OtaConfigFile> for OtaConfig {
    fn from(file: OtaConfigFile) -> Self {
        Self {
            publish_id: file.publish_id,
            update_policy: UpdatePolicy::new(
                file.check_on_start,
                file.periodic_interval_secs.map(Duration::from_secs),
            ),
            request_timeout: Duration::from_secs(file.request_timeout_secs),
            log_level: file.log_level,
            endpoint: EndpointConfig {
                host: file.host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
                platform: file.platform.unwrap_or_else(|| DEFAULT_PLATFORM.to_string()),
            },
        }
    }
}
