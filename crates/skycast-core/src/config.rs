//! Configuration loading and typed config structures for Skycast.
//!
//! The canonical configuration lives in `skycast-config.yaml` at the project
//! root. Every field has a default, so a missing file or an empty document
//! yields a working service for the five built-in cities.
//!
//! Two environment variables override the file:
//! - `SKYCAST_PORT` overrides `server.port`
//! - `SKYCAST_MODEL_PATH` overrides `model.path`

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use skycast_types::CityProfile;
use skycast_world::default_cities;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The configuration parsed but is not usable.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level service configuration.
///
/// Mirrors the structure of `skycast-config.yaml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SkycastConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerSettings,

    /// Tick timing, history, and randomness.
    #[serde(default)]
    pub simulation: SimulationSettings,

    /// Forecast model location.
    #[serde(default)]
    pub model: ModelConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Simulated cities, in broadcast order.
    #[serde(default = "default_cities")]
    pub cities: Vec<CityProfile>,
}

impl Default for SkycastConfig {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            simulation: SimulationSettings::default(),
            model: ModelConfig::default(),
            logging: LoggingConfig::default(),
            cities: default_cities(),
        }
    }
}

impl SkycastConfig {
    /// Load and validate configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Like [`from_file`](Self::from_file), but a missing file yields the
    /// defaults (still subject to environment overrides).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for anything other than a missing file.
    pub fn from_file_or_default(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let mut config = Self::default();
                config.apply_env_overrides()?;
                config.validate()?;
                Ok(config)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Parse and validate configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `SKYCAST_PORT` and `SKYCAST_MODEL_PATH` from the process
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `SKYCAST_PORT` is not a port
    /// number.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(val) = lookup("SKYCAST_PORT") {
            self.server.port = val.trim().parse().map_err(|e| ConfigError::Invalid {
                reason: format!("SKYCAST_PORT {val:?} is not a valid port: {e}"),
            })?;
        }
        if let Some(val) = lookup("SKYCAST_MODEL_PATH") {
            self.model.path = PathBuf::from(val);
        }
        Ok(())
    }

    /// Check the invariants the service relies on.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a zero tick interval, an empty
    /// or duplicated city list, or an inverted temperature band.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| Err(ConfigError::Invalid { reason });

        if self.simulation.tick_interval_ms == 0 {
            return invalid(String::from("simulation.tick_interval_ms must be positive"));
        }
        if self.simulation.history_capacity == 0 {
            return invalid(String::from("simulation.history_capacity must be positive"));
        }
        if self.simulation.subscriber_queue == 0 {
            return invalid(String::from("simulation.subscriber_queue must be positive"));
        }
        if self.cities.is_empty() {
            return invalid(String::from("at least one city must be configured"));
        }

        let mut seen = BTreeSet::new();
        for city in &self.cities {
            if !seen.insert(city.name.as_str()) {
                return invalid(format!("city {:?} is configured twice", city.name));
            }
            let (min, max) = (city.min_seasonal_temp, city.max_seasonal_temp);
            if !min.is_finite() || !max.is_finite() || min > max {
                return invalid(format!(
                    "city {:?} has an invalid temperature band ({min} to {max})",
                    city.name
                ));
            }
        }
        Ok(())
    }
}

/// HTTP listener configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerSettings {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,

    /// Listen port.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Simulation timing and bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulationSettings {
    /// Milliseconds between broadcasts.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Milliseconds to wait after a failed tick before retrying.
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// How far ahead forecasts are stamped, in seconds.
    #[serde(default = "default_forecast_horizon_secs")]
    pub forecast_horizon_secs: u32,

    /// Number of observations kept for the history endpoint.
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// Random seed; `None` draws from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Outbound frames buffered per subscriber before frames are dropped.
    #[serde(default = "default_subscriber_queue")]
    pub subscriber_queue: usize,
}

impl SimulationSettings {
    /// Tick interval as a [`Duration`].
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Retry backoff as a [`Duration`].
    pub const fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    /// Forecast horizon as a [`chrono::Duration`].
    pub fn forecast_horizon(&self) -> chrono::Duration {
        chrono::Duration::seconds(i64::from(self.forecast_horizon_secs))
    }
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            retry_backoff_ms: default_retry_backoff_ms(),
            forecast_horizon_secs: default_forecast_horizon_secs(),
            history_capacity: default_history_capacity(),
            seed: None,
            subscriber_queue: default_subscriber_queue(),
        }
    }
}

/// Forecast model configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModelConfig {
    /// Path of the persisted model JSON.
    #[serde(default = "default_model_path")]
    pub path: PathBuf,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_port() -> u16 {
    8000
}

const fn default_tick_interval_ms() -> u64 {
    5_000
}

const fn default_retry_backoff_ms() -> u64 {
    1_000
}

const fn default_forecast_horizon_secs() -> u32 {
    5
}

const fn default_history_capacity() -> usize {
    1_000
}

const fn default_subscriber_queue() -> usize {
    16
}

fn default_model_path() -> PathBuf {
    PathBuf::from("weather_model.json")
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn parse_without_env(yaml: &str) -> Result<SkycastConfig, ConfigError> {
        let mut config: SkycastConfig = if yaml.trim().is_empty() {
            SkycastConfig::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    #[test]
    fn default_config_is_valid() {
        let config = SkycastConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.simulation.tick_interval_ms, 5000);
        assert_eq!(config.simulation.retry_backoff_ms, 1000);
        assert_eq!(config.simulation.history_capacity, 1000);
        assert_eq!(config.simulation.seed, None);
        assert_eq!(config.model.path, PathBuf::from("weather_model.json"));
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.cities.len(), 5);
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
server:
  host: "127.0.0.1"
  port: 9001

simulation:
  tick_interval_ms: 250
  retry_backoff_ms: 100
  forecast_horizon_secs: 10
  history_capacity: 50
  seed: 7
  subscriber_queue: 4

model:
  path: "/tmp/model.json"

logging:
  level: "debug"

cities:
  - name: "Reykjavik"
    latitude: 64.1466
    longitude: -21.9426
    min_seasonal_temp: -2.0
    max_seasonal_temp: 14.0
"#;

        let config = parse_without_env(yaml).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9001);
        assert_eq!(config.simulation.tick_interval(), Duration::from_millis(250));
        assert_eq!(config.simulation.retry_backoff(), Duration::from_millis(100));
        assert_eq!(config.simulation.forecast_horizon(), chrono::Duration::seconds(10));
        assert_eq!(config.simulation.seed, Some(7));
        assert_eq!(config.simulation.subscriber_queue, 4);
        assert_eq!(config.model.path, PathBuf::from("/tmp/model.json"));
        assert_eq!(config.logging.level, "debug");
        let names: Vec<&str> = config.cities.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Reykjavik"]);
    }

    #[test]
    fn parse_minimal_yaml() {
        let config = parse_without_env("simulation:\n  seed: 11\n").unwrap();
        assert_eq!(config.simulation.seed, Some(11));
        assert_eq!(config.simulation.tick_interval_ms, 5000);
        assert_eq!(config.cities, default_cities());
    }

    #[test]
    fn parse_empty_yaml() {
        assert_eq!(parse_without_env("").unwrap(), SkycastConfig::default());
    }

    #[test]
    fn zero_interval_is_rejected() {
        let err = parse_without_env("simulation:\n  tick_interval_ms: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn empty_and_duplicate_cities_are_rejected() {
        assert!(matches!(
            parse_without_env("cities: []\n"),
            Err(ConfigError::Invalid { .. })
        ));

        let mut config = SkycastConfig::default();
        let first = config.cities.first().cloned().unwrap();
        config.cities.push(first);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn inverted_band_is_rejected() {
        let mut config = SkycastConfig::default();
        let tokyo = config.cities.iter_mut().find(|c| c.name == "Tokyo").unwrap();
        tokyo.min_seasonal_temp = 40.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn malformed_yaml_is_a_yaml_error() {
        assert!(matches!(
            parse_without_env("server: [unclosed"),
            Err(ConfigError::Yaml { .. })
        ));
    }

    #[test]
    fn overrides_replace_port_and_model_path() {
        let mut config = SkycastConfig::default();
        config
            .apply_overrides(|key| match key {
                "SKYCAST_PORT" => Some(String::from("8123")),
                "SKYCAST_MODEL_PATH" => Some(String::from("models/alt.json")),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.server.port, 8123);
        assert_eq!(config.model.path, PathBuf::from("models/alt.json"));
    }

    #[test]
    fn bad_port_override_is_rejected() {
        let mut config = SkycastConfig::default();
        let result = config.apply_overrides(|key| {
            (key == "SKYCAST_PORT").then(|| String::from("eighty"))
        });
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let path = std::env::temp_dir().join("skycast-config-that-does-not-exist.yaml");
        let config = SkycastConfig::from_file_or_default(&path).unwrap();
        assert_eq!(config.cities, default_cities());
        assert!(matches!(
            SkycastConfig::from_file(&path),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("skycast-config.yaml");
        if path.exists() {
            let config = SkycastConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}
