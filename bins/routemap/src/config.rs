//! Configuration file loading
//!
//! Looks for `routemap.toml` in the standard locations unless a path is
//! given. Every section and key is optional.

use anyhow::{Context, Result};
use routemap_geo::track::COORDINATE_DECIMALS;
use routemap_telemetry::TelemetryConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Candidate config files, in search order
const CANDIDATES: [&str; 3] = [".routemap.toml", "routemap.toml", ".config/routemap.toml"];

/// Root configuration schema
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub track: TrackConfig,
    pub grid: GridConfig,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,
    pub json_logs: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

/// Track summary settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackConfig {
    /// Simplification tolerance in degrees (~20 m)
    pub tolerance: f64,
    /// Decimal places kept in published coordinates
    pub decimals: usize,
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            tolerance: 0.0002,
            decimals: COORDINATE_DECIMALS,
        }
    }
}

/// Grid reference enrichment settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Record field holding the grid reference
    pub reference_field: String,
    /// Key of the record array in the input document; unused when the document is an array
    pub records_key: String,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            reference_field: "map_reference".to_string(),
            records_key: "climbs".to_string(),
        }
    }
}

impl Config {
    /// Load from `path`, or the first standard location that exists, or defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path.map(Path::to_path_buf).or_else(find_config_file) {
            Some(p) => load_config_file(&p),
            None => Ok(Self::default()),
        }
    }

    /// Logging settings for the telemetry crate
    pub fn telemetry(&self) -> TelemetryConfig {
        TelemetryConfig {
            log_level: self.general.log_level.clone(),
            json: self.general.json_logs,
            ..TelemetryConfig::default()
        }
    }
}

fn find_config_file() -> Option<PathBuf> {
    CANDIDATES.iter().map(PathBuf::from).find(|p| p.exists())
}

fn load_config_file(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;

    toml::from_str(&content).with_context(|| format!("Failed to parse config file {}", path.display()))
}
