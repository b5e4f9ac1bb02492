//! Structured logging setup.

use crate::config::LoggingConfig;
use thiserror::Error;
use tracing_subscriber::{
    EnvFilter, filter::ParseError, fmt, layer::SubscriberExt, util::SubscriberInitExt,
    util::TryInitError,
};

/// Errors raised while installing the global subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The configured filter directive is malformed.
    #[error("invalid log filter: {0}")]
    InvalidFilter(#[from] ParseError),
    /// A global subscriber is already installed.
    #[error("log subscriber already installed: {0}")]
    AlreadyInstalled(#[from] TryInitError),
}

/// Installs the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. Output is JSON
/// lines when `config.json` is set and human-readable otherwise.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidFilter`] for a malformed level directive
/// and [`TelemetryError::AlreadyInstalled`] when a subscriber already exists.
pub fn init(config: &LoggingConfig) -> Result<(), TelemetryError> {
    let filter = build_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok(), &config.level)?;
    let registry = tracing_subscriber::registry().with(filter);
    if config.json {
        registry.with(fmt::layer().json()).try_init()?;
    } else {
        registry.with(fmt::layer()).try_init()?;
    }
    Ok(())
}

fn build_filter(from_env: Option<String>, level: &str) -> Result<EnvFilter, ParseError> {
    from_env
        .filter(|directives| !directives.trim().is_empty())
        .map_or_else(|| EnvFilter::try_new(level), EnvFilter::try_new)
}
