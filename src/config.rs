//! Runtime configuration.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! `ARIES__*` environment variables (`ARIES__LOOKUP__TIMEOUT_MS=5000` sets
//! `lookup.timeout_ms`).

use crate::lookup::services::AggregatorSettings;
use camino::{Utf8Path, Utf8PathBuf};
use ::config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

const ENV_PREFIX: &str = "ARIES";
const ENV_SEPARATOR: &str = "__";

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or deserialized.
    #[error("failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),
    /// A setting holds an unusable value.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AriesConfig {
    /// Socket address the HTTP server binds.
    pub listen_addr: SocketAddr,
    /// JSON document holding the registered services.
    pub store_path: Utf8PathBuf,
    /// Legacy `name,url` file, next to the store, imported when the store
    /// does not exist yet.
    pub seed_csv: Option<String>,
    /// Liveness probe settings.
    pub probe: ProbeConfig,
    /// Lookup fan-out settings.
    pub lookup: LookupConfig,
    /// Heartbeat settings.
    pub heartbeat: HeartbeatConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

impl Default for AriesConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            store_path: Utf8PathBuf::from("services.json"),
            seed_csv: Some("services.csv".to_owned()),
            probe: ProbeConfig::default(),
            lookup: LookupConfig::default(),
            heartbeat: HeartbeatConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Liveness probe settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Probe timeout in milliseconds.
    pub timeout_ms: u64,
    /// Path appended to a service address to reach its liveness route.
    pub liveness_suffix: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 2_000,
            liveness_suffix: "aries".to_owned(),
        }
    }
}

impl ProbeConfig {
    /// Returns the probe timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Lookup fan-out settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Per-call timeout in milliseconds.
    pub timeout_ms: u64,
    /// Extra merge wait beyond the call timeout, in milliseconds.
    pub merge_slack_ms: u64,
    /// Path placed between a service address and the identifier.
    pub path_suffix: String,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            merge_slack_ms: 2_000,
            path_suffix: "aries".to_owned(),
        }
    }
}

impl LookupConfig {
    /// Returns the per-call timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Returns the aggregator timing limits.
    #[must_use]
    pub const fn aggregator_settings(&self) -> AggregatorSettings {
        AggregatorSettings::new(self.timeout(), Duration::from_millis(self.merge_slack_ms))
    }
}

/// Heartbeat settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeartbeatConfig {
    /// Seconds between liveness sweeps.
    pub interval_secs: u64,
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self { interval_secs: 60 }
    }
}

impl HeartbeatConfig {
    /// Returns the sweep period.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            json: false,
        }
    }
}

impl AriesConfig {
    /// Loads configuration from defaults, `path` and the process environment.
    ///
    /// A missing file at `path` is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] when a source cannot be parsed and
    /// [`ConfigError::Invalid`] when validation fails.
    pub fn load(path: Option<&Utf8Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, environment())
    }

    /// Parses configuration from TOML text layered over the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] when the text cannot be parsed and
    /// [`ConfigError::Invalid`] when validation fails.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from_str(contents, FileFormat::Toml))
            .build()?;
        let parsed: Self = settings.try_deserialize()?;
        parsed.validate()?;
        Ok(parsed)
    }

    fn load_with_env(path: Option<&Utf8Path>, env: Environment) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(file) = path {
            builder = builder.add_source(File::new(file.as_str(), FileFormat::Toml).required(false));
        }
        let settings = builder.add_source(env).build()?;
        let parsed: Self = settings.try_deserialize()?;
        parsed.validate()?;
        Ok(parsed)
    }

    /// Checks that every timing setting is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for zero timeouts or intervals, a
    /// probe timeout not shorter than the lookup timeout, or empty route
    /// suffixes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.probe.timeout_ms == 0 {
            return Err(ConfigError::Invalid("probe.timeout_ms must be positive".to_owned()));
        }
        if self.lookup.timeout_ms == 0 {
            return Err(ConfigError::Invalid("lookup.timeout_ms must be positive".to_owned()));
        }
        if self.heartbeat.interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "heartbeat.interval_secs must be positive".to_owned(),
            ));
        }
        if self.probe.timeout_ms >= self.lookup.timeout_ms {
            return Err(ConfigError::Invalid(format!(
                "probe.timeout_ms ({}) must be shorter than lookup.timeout_ms ({})",
                self.probe.timeout_ms, self.lookup.timeout_ms
            )));
        }
        if self.probe.liveness_suffix.trim_matches('/').is_empty()
            || self.lookup.path_suffix.trim_matches('/').is_empty()
        {
            return Err(ConfigError::Invalid("route suffixes must not be empty".to_owned()));
        }
        Ok(())
    }

    /// Replaces the listening port, keeping the bind address.
    pub const fn set_port(&mut self, port: u16) {
        self.listen_addr = SocketAddr::new(self.listen_addr.ip(), port);
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator(ENV_SEPARATOR)
        .separator(ENV_SEPARATOR)
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env_from(pairs: &[(&str, &str)]) -> Environment {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect();
        environment().source(Some(vars))
    }

    #[test]
    fn defaults_are_valid() {
        let defaults = AriesConfig::default();

        defaults.validate().expect("defaults should validate");
        assert_eq!(defaults.listen_addr.port(), 8080);
        assert_eq!(defaults.probe.timeout(), Duration::from_secs(2));
        assert_eq!(
            defaults.lookup.aggregator_settings(),
            AggregatorSettings::default()
        );
        assert_eq!(defaults.heartbeat.interval(), Duration::from_secs(60));
    }

    #[test]
    fn toml_overrides_defaults() {
        let parsed = AriesConfig::from_toml_str(
            r#"
            listen_addr = "127.0.0.1:9000"
            store_path = "/var/lib/aries/services.json"

            [lookup]
            timeout_ms = 4000

            [logging]
            json = true
            "#,
        )
        .expect("config should parse");

        assert_eq!(parsed.listen_addr, SocketAddr::from(([127, 0, 0, 1], 9000)));
        assert_eq!(parsed.store_path, "/var/lib/aries/services.json");
        assert_eq!(parsed.lookup.timeout_ms, 4000);
        assert_eq!(parsed.lookup.merge_slack_ms, 2000);
        assert!(parsed.logging.json);
        assert_eq!(parsed.probe, ProbeConfig::default());
    }

    #[test]
    fn environment_overrides_file() {
        let dir = TempDir::new().expect("temp dir");
        let path = Utf8PathBuf::try_from(dir.path().join("aries.toml")).expect("UTF-8 path");
        std::fs::write(&path, "[heartbeat]\ninterval_secs = 30\n").expect("file written");

        let loaded = AriesConfig::load_with_env(
            Some(&path),
            env_from(&[
                ("ARIES__HEARTBEAT__INTERVAL_SECS", "15"),
                ("ARIES__LOGGING__LEVEL", "debug"),
            ]),
        )
        .expect("config should load");

        assert_eq!(loaded.heartbeat.interval_secs, 15);
        assert_eq!(loaded.logging.level, "debug");
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let loaded = AriesConfig::load_with_env(
            Some(Utf8Path::new("/nonexistent/aries.toml")),
            env_from(&[]),
        )
        .expect("config should load");

        assert_eq!(loaded, AriesConfig::default());
    }

    #[rstest]
    #[case("[probe]\ntimeout_ms = 0\n")]
    #[case("[lookup]\ntimeout_ms = 0\n")]
    #[case("[heartbeat]\ninterval_secs = 0\n")]
    #[case("[probe]\ntimeout_ms = 10000\n")]
    #[case("[lookup]\npath_suffix = \"/\"\n")]
    fn unusable_settings_are_rejected(#[case] contents: &str) {
        let result = AriesConfig::from_toml_str(contents);

        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn port_override_keeps_host() {
        let mut config = AriesConfig::default();

        config.set_port(9999);

        assert_eq!(config.listen_addr, SocketAddr::from(([0, 0, 0, 0], 9999)));
    }
}
