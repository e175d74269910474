//! Host-facing update policy and log verbosity.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// When the runtime checks for new strings on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdatePolicy {
    /// Run one sync right after bootstrapping from cache
    pub check_on_start: bool,
    /// Recurring sync interval; absent or zero disables periodic sync
    pub periodic_interval: Option<Duration>,
}

impl UpdatePolicy {
    pub fn new(check_on_start: bool, periodic_interval: Option<Duration>) -> Self {
        Self { check_on_start, periodic_interval }
    }

    /// Interval to schedule, if periodic sync is enabled.
    pub fn effective_interval(&self) -> Option<Duration> {
        self.periodic_interval.filter(|interval| !interval.is_zero())
    }
}

impl Default for UpdatePolicy {
    fn default() -> Self {
        Self { check_on_start: true, periodic_interval: None }
    }
}

/// Log verbosity, ordered from silent to most verbose.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    None,
    Error,
    #[default]
    #[serde(alias = "warn")]
    Warning,
    Info,
    Debug,
    #[serde(alias = "trace")]
    Verbose,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Verbose => "verbose",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "off" => Ok(Self::None),
            "error" => Ok(Self::Error),
            "warning" | "warn" => Ok(Self::Warning),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "verbose" | "trace" => Ok(Self::Verbose),
            other => Err(format!("unknown log level: {}", other)),
        }
    }
}
