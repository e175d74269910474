//! Logging setup.
//!
//! The engine emits `tracing` events everywhere; this module only decides
//! whether to install a default fmt subscriber for hosts that have none.

use ota_strings_types::LogLevel;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Map the host-facing level onto a tracing level; `None` disables output.
pub fn tracing_level(level: LogLevel) -> Option<Level> {
    match level {
        LogLevel::None => None,
        LogLevel::Error => Some(Level::ERROR),
        LogLevel::Warning => Some(Level::WARN),
        LogLevel::Info => Some(Level::INFO),
        LogLevel::Debug => Some(Level::DEBUG),
        LogLevel::Verbose => Some(Level::TRACE),
    }
}

/// Install a global fmt subscriber at `level`, best-effort.
///
/// `RUST_LOG` takes precedence when set. An already-installed global
/// subscriber is kept.
pub fn init(level: LogLevel) {
    let Some(max_level) = tracing_level(level) else {
        return;
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(max_level.as_str().to_ascii_lowercase()));

    let installed = tracing_subscriber::fmt().with_env_filter(filter).try_init().is_ok();
    if !installed {
        tracing::debug!(level = %level, "Tracing subscriber already installed, keeping it");
    }
}
