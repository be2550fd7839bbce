//! Configuration file support for Mensura.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/mensura/config.toml`.

use crate::forecast::MAX_HORIZON_DAYS;
use crate::report::TrendSettings;
use crate::trend::MAX_ROLLING_WINDOW_DAYS;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub access: AccessConfig,

    #[serde(default)]
    pub trends: TrendsConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Shared-secret configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct AccessConfig {
    /// Overridden by `APP_PASSWORD` when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Trend view parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrendsConfig {
    #[serde(default = "default_rolling_window_days")]
    pub rolling_window_days: u32,

    #[serde(default = "default_forecast_horizon_days")]
    pub forecast_horizon_days: u32,
}

impl Default for TrendsConfig {
    fn default() -> Self {
        Self {
            rolling_window_days: default_rolling_window_days(),
            forecast_horizon_days: default_forecast_horizon_days(),
        }
    }
}

impl TrendsConfig {
    pub fn settings(&self) -> TrendSettings {
        TrendSettings {
            rolling_window_days: self.rolling_window_days,
            forecast_horizon_days: self.forecast_horizon_days,
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| home_dir().join(".local/share"));
    base.join("mensura")
}

fn default_rolling_window_days() -> u32 {
    crate::trend::DEFAULT_ROLLING_WINDOW_DAYS
}

fn default_forecast_horizon_days() -> u32 {
    crate::forecast::DEFAULT_HORIZON_DAYS
}

fn home_dir() -> PathBuf {
    dirs::home_dir()
        .or_else(|| std::env::var_os("HOME").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."))
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Reject values the trend views cannot use
    pub fn validate(&self) -> Result<()> {
        let window = self.trends.rolling_window_days;
        if !(1..=MAX_ROLLING_WINDOW_DAYS).contains(&window) {
            return Err(Error::Config(format!(
                "trends.rolling_window_days must be between 1 and {}, got {}",
                MAX_ROLLING_WINDOW_DAYS, window
            )));
        }
        let horizon = self.trends.forecast_horizon_days;
        if horizon > MAX_HORIZON_DAYS {
            return Err(Error::Config(format!(
                "trends.forecast_horizon_days must be at most {}, got {}",
                MAX_HORIZON_DAYS, horizon
            )));
        }
        Ok(())
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| home_dir().join(".config"));
        base.join("mensura").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
