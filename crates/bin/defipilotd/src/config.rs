//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `defipilot.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::time::Duration;

use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Evaluation scheduler settings.
    pub scheduler: SchedulerConfig,
    /// Database settings.
    pub database: DatabaseConfig,
    /// Downstream collaborator service settings.
    pub services: ServicesConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Evaluation loop configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Seconds between evaluation passes.
    pub interval_secs: u64,
}

/// `SQLite` database configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL or file path.
    pub url: String,
}

/// Downstream service endpoints and timeouts.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServicesConfig {
    /// Base URL of the DeFi market-data service.
    pub defi_url: String,
    /// Base URL of the ML risk-forecast service.
    pub ml_url: String,
    /// Per-request timeout in seconds for downstream calls.
    pub timeout_secs: u64,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `defipilot.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("defipilot.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("DEFIPILOT_INTERVAL_SECS") {
            if let Ok(secs) = val.parse() {
                self.scheduler.interval_secs = secs;
            }
        }
        if let Ok(val) = std::env::var("DEFIPILOT_DATABASE_URL") {
            self.database.url = val;
        }
        if let Ok(val) = std::env::var("DEFI_SERVICE_URL") {
            self.services.defi_url = val;
        }
        if let Ok(val) = std::env::var("ML_SERVICE_URL") {
            self.services.ml_url = val;
        }
        if let Ok(val) = std::env::var("DEFIPILOT_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.scheduler.interval_secs == 0 {
            return Err(ConfigError::Validation(
                "scheduler interval must be non-zero".to_string(),
            ));
        }
        if self.services.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "service timeout must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Interval between evaluation passes.
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.scheduler.interval_secs)
    }

    /// Per-request timeout for downstream calls.
    #[must_use]
    pub fn service_timeout(&self) -> Duration {
        Duration::from_secs(self.services.timeout_secs)
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { interval_secs: 30 }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:defipilot.db?mode=rwc".to_string(),
        }
    }
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            defi_url: "http://localhost:8081".to_string(),
            ml_url: "http://localhost:8001".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "defipilotd=info,defipilot=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
