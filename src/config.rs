//! Configuration file handling for the key-reader demo.
//!
//! Loads configuration from `<config dir>/key-reader/config.toml` or a custom path.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::line_input::DEFAULT_MINIMUM_INTERVAL;

/// Configuration file structure.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub keys: KeysConfig,
    #[serde(default)]
    pub lines: LinesConfig,
}

/// Settings for the keypress polling demo.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct KeysConfig {
    /// Print open/close notices
    #[serde(default = "default_true")]
    pub verbose: bool,
    /// Sleep between polls that found no key
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for KeysConfig {
    fn default() -> Self {
        Self {
            verbose: true,
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl KeysConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Settings for the debounced line input demo.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LinesConfig {
    #[serde(default)]
    pub prompt: String,
    /// Seconds an empty line must trail the previous one to be accepted
    #[serde(default = "default_minimum_interval_secs")]
    pub minimum_interval_secs: f64,
}

impl Default for LinesConfig {
    fn default() -> Self {
        Self {
            prompt: String::new(),
            minimum_interval_secs: default_minimum_interval_secs(),
        }
    }
}

impl LinesConfig {
    /// The debounce window as a [`Duration`].
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidInterval`] for negative, NaN or infinite values.
    pub fn minimum_interval(&self) -> Result<Duration, ConfigError> {
        parse_interval(self.minimum_interval_secs)
    }
}

/// Convert seconds to a debounce window, rejecting values that are not a
/// finite non-negative number.
pub fn parse_interval(secs: f64) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f64(secs).map_err(|_| ConfigError::InvalidInterval(secs))
}

fn default_true() -> bool {
    true
}

fn default_poll_interval_ms() -> u64 {
    50
}

fn default_minimum_interval_secs() -> f64 {
    DEFAULT_MINIMUM_INTERVAL.as_secs_f64()
}

impl Config {
    /// Load configuration from a file path.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io {
                path: path.clone(),
                source: e,
            })?;
            let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
                path: path.clone(),
                source: e,
            })?;
            log::debug!("Loaded config from {}", path.display());
            Ok(config)
        } else {
            log::debug!("No config at {}, using defaults", path.display());
            Ok(Config::default())
        }
    }

    /// Render as TOML, the same format `load` reads.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid minimum interval {0}: expected a non-negative number of seconds")]
    InvalidInterval(f64),
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("key-reader").join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/key-reader/config.toml")
        })
}
