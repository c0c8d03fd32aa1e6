//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/cravelog/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/cravelog/` (~/.config/cravelog/)
//! - Data: `$XDG_DATA_HOME/cravelog/` (~/.local/share/cravelog/)
//! - State/Logs: `$XDG_STATE_HOME/cravelog/` (~/.local/state/cravelog/)

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_DATA_HOME or ~/.local/share
fn xdg_data_home() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/share"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Analytics aggregation configuration
    #[serde(default)]
    pub analytics: AnalyticsConfig,

    /// Event tracking configuration
    #[serde(default)]
    pub tracking: TrackingConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Analytics aggregation configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AnalyticsConfig {
    /// Occurrences within the trailing window that mark a
    /// high-frequency pattern
    #[serde(default = "default_high_frequency_threshold")]
    pub high_frequency_threshold: u32,

    /// Trailing window length in seconds
    #[serde(default = "default_high_frequency_window_secs")]
    pub high_frequency_window_secs: u64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            high_frequency_threshold: default_high_frequency_threshold(),
            high_frequency_window_secs: default_high_frequency_window_secs(),
        }
    }
}

fn default_high_frequency_threshold() -> u32 {
    3
}

fn default_high_frequency_window_secs() -> u64 {
    3600
}

/// Event tracking configuration
#[derive(Debug, Deserialize, Clone)]
pub struct TrackingConfig {
    /// Broadcast channel capacity; a subscriber that falls further
    /// behind than this observes a lag error
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
        }
    }
}

fn default_channel_capacity() -> usize {
    64
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration, returning an error message if invalid
    pub fn validate(&self) -> Result<()> {
        if self.analytics.high_frequency_window_secs == 0 {
            return Err(Error::Config(
                "analytics.high_frequency_window_secs must be greater than zero".to_string(),
            ));
        }
        if self.analytics.high_frequency_threshold == 0 {
            return Err(Error::Config(
                "analytics.high_frequency_threshold must be greater than zero".to_string(),
            ));
        }
        if self.tracking.channel_capacity == 0 {
            return Err(Error::Config(
                "tracking.channel_capacity must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/cravelog/config.toml` (~/.config/cravelog/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("cravelog").join("config.toml")
    }

    /// Returns the data directory path (for the SQLite database)
    ///
    /// `$XDG_DATA_HOME/cravelog/` (~/.local/share/cravelog/)
    pub fn data_dir() -> PathBuf {
        xdg_data_home().join("cravelog")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/cravelog/` (~/.local/state/cravelog/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("cravelog")
    }

    /// Returns the database file path
    ///
    /// `$XDG_DATA_HOME/cravelog/data.db` (~/.local/share/cravelog/data.db)
    pub fn database_path() -> PathBuf {
        Self::data_dir().join("data.db")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/cravelog/cravelog.log` (~/.local/state/cravelog/cravelog.log)
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("cravelog.log")
    }
}
