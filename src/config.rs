/// Dashboard configuration.
///
/// Loaded from a TOML file (every field optional), then overridden from
/// environment variables. A `.env` file in the working directory is read
/// first via `dotenv`, so local overrides don't need exporting.
///
/// ```toml
/// api_base_url = "http://localhost:5000"
/// request_timeout_secs = 10
/// default_location = "Kennedy Space Center"
/// map_sites = ["Kennedy Space Center", "Cape Canaveral"]
/// log_level = "info"
/// log_file = "launchmon.log"
/// console_timestamps = false
/// ```

use crate::ingest::backend::DEFAULT_BASE_URL;
use crate::logging::LogLevel;
use crate::model::Location;
use crate::sites;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

pub const ENV_API_BASE: &str = "LAUNCHMON_API_BASE";
pub const ENV_TIMEOUT_SECS: &str = "LAUNCHMON_TIMEOUT_SECS";
pub const ENV_LOG_LEVEL: &str = "LAUNCHMON_LOG_LEVEL";
pub const ENV_LOG_FILE: &str = "LAUNCHMON_LOG_FILE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("Invalid value for {var}: {reason}")]
    InvalidEnv { var: &'static str, reason: String },
    #[error("Invalid {field} in {path}: {reason}")]
    Invalid {
        path: String,
        field: &'static str,
        reason: String,
    },
}

const ZERO_TIMEOUT: &str = "must be at least 1 second";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub default_location: Location,
    pub map_sites: Vec<Location>,
    pub log_level: LogLevel,
    pub log_file: Option<String>,
    pub console_timestamps: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: 10,
            default_location: Location::KennedySpaceCenter,
            map_sites: sites::all_locations(),
            log_level: LogLevel::Info,
            log_file: None,
            console_timestamps: false,
        }
    }
}

impl DashboardConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn from_toml_str(contents: &str, path: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })?;
        if config.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                path: path.to_string(),
                field: "request_timeout_secs",
                reason: ZERO_TIMEOUT.to_string(),
            });
        }
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;
        Self::from_toml_str(&contents, &display)
    }

    /// Applies overrides from `lookup`, which maps a variable name to its
    /// value if set.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base) = lookup(ENV_API_BASE) {
            self.api_base_url = base;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|e| ConfigError::InvalidEnv {
                var: ENV_TIMEOUT_SECS,
                reason: format!("{}", e),
            })?;
            if secs == 0 {
                return Err(ConfigError::InvalidEnv {
                    var: ENV_TIMEOUT_SECS,
                    reason: ZERO_TIMEOUT.to_string(),
                });
            }
            self.request_timeout_secs = secs;
        }
        if let Some(raw) = lookup(ENV_LOG_LEVEL) {
            self.log_level = raw
                .parse()
                .map_err(|reason| ConfigError::InvalidEnv { var: ENV_LOG_LEVEL, reason })?;
        }
        if let Some(path) = lookup(ENV_LOG_FILE) {
            self.log_file = if path.is_empty() { None } else { Some(path) };
        }
        Ok(())
    }

    /// Loads the file (if given), then `.env` and process environment
    /// overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|var| std::env::var(var).ok())?;
        Ok(config)
    }
}
