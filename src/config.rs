//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the solar-config.toml
//! file. It holds the defaults a request falls back to when a value is not given
//! on the command line: the observer location, the chart steps and the export
//! policy.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Default config file name, looked up in the working directory
pub const CONFIG_FILE: &str = "solar-config.toml";

/// Application configuration loaded from solar-config.toml
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Observer location
    pub location: LocationConfig,
    /// Sampling and axis settings
    pub chart: ChartConfig,
    /// Table export settings
    #[serde(default)]
    pub export: ExportConfig,
}

/// Observer location configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LocationConfig {
    /// Degrees north
    pub latitude: f64,
    /// Degrees east
    pub longitude: f64,
    /// Meters above sea level
    pub altitude: f64,
    /// UTC offset (`+09:00`, `9`) or IANA zone name (`Asia/Tokyo`).
    /// When absent the zone is derived from the longitude.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

/// Sampling and tick configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ChartConfig {
    /// Minutes between samples
    pub interval_minutes: i64,
    /// Degrees either side of each special angle
    pub angle_threshold: f64,
    /// Minutes between x-axis ticks
    pub xtick_minutes: i64,
    /// Degrees between y-axis ticks
    pub ytick_degrees: i64,
}

/// Export configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ExportConfig {
    /// Write the `Highlighted` column in CSV tables
    pub include_highlight: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            location: LocationConfig {
                latitude: 35.6895,
                longitude: 139.6917,
                altitude: 0.0,
                timezone: Some("+09:00".to_string()), // Tokyo
            },
            chart: ChartConfig {
                interval_minutes: 10,
                angle_threshold: 1.0,
                xtick_minutes: 60,
                ytick_degrees: 10,
            },
            export: ExportConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from solar-config.toml
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(CONFIG_FILE)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    info!(
                        path = %path.display(),
                        latitude = config.location.latitude,
                        longitude = config.location.longitude,
                        "loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "invalid config file, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                info!(path = %path.display(), "no config file found, using defaults (Tokyo)");
                Self::default()
            }
        }
    }

    /// Save current configuration to solar-config.toml
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.save_to_path(CONFIG_FILE)
    }

    /// Save current configuration to the given path
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path.as_ref(), contents)?;
        info!(path = %path.as_ref().display(), "configuration saved");
        Ok(())
    }
}
