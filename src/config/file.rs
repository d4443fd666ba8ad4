//! TOML configuration file loading
//!
//! Supports `~/.config/rumbo/config.toml` as a persistent config source.
//! All fields are optional — the file is a partial overlay on top of defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::Result;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct RumboConfigFile {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerFileConfig,

    /// Weather API configuration
    #[serde(default)]
    pub weather: WeatherFileConfig,

    /// Chat backend configuration
    #[serde(default)]
    pub backend: BackendFileConfig,

    /// Notification rule thresholds
    #[serde(default)]
    pub notifications: NotificationsFileConfig,

    /// Background scanner cadence
    #[serde(default)]
    pub scanner: ScannerFileConfig,
}

/// HTTP server configuration
#[derive(Debug, Default, Deserialize)]
pub struct ServerFileConfig {
    /// API server port
    pub port: Option<u16>,
}

/// Weather API configuration
#[derive(Debug, Default, Deserialize)]
pub struct WeatherFileConfig {
    /// Current-weather endpoint URL
    pub api_url: Option<String>,

    /// API key
    pub api_key: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,
}

/// Chat backend configuration
#[derive(Debug, Default, Deserialize)]
pub struct BackendFileConfig {
    /// Chat endpoint URL
    pub api_url: Option<String>,

    /// API key (backend disabled when absent)
    pub api_key: Option<String>,

    /// Workspace/space identifier sent with each request
    pub space_id: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,
}

/// Notification rule thresholds
#[derive(Debug, Default, Deserialize)]
pub struct NotificationsFileConfig {
    pub temperature_low_c: Option<f64>,
    pub temperature_high_c: Option<f64>,
    pub rain_probability_pct: Option<u8>,
    pub trigger_hours: Option<Vec<u32>>,
}

/// Background scanner cadence
#[derive(Debug, Default, Deserialize)]
pub struct ScannerFileConfig {
    /// Seconds between scan cycles
    pub interval_secs: Option<u64>,

    /// Activity window in seconds for a session to count as active
    pub active_window_secs: Option<i64>,

    /// Idle seconds after which a session is evicted
    pub evict_after_secs: Option<i64>,
}

/// Load the TOML config file.
///
/// With an explicit `path` the file must exist and parse. Without one the
/// standard path is tried best-effort and problems fall back to defaults.
///
/// # Errors
///
/// Returns an error when an explicitly given path can't be read or parsed.
pub fn load_config_file(path: Option<&Path>) -> Result<RumboConfigFile> {
    if let Some(path) = path {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        tracing::info!(path = %path.display(), "loaded config file");
        return Ok(config);
    }

    let Some(path) = config_file_path() else {
        return Ok(RumboConfigFile::default());
    };

    if !path.exists() {
        return Ok(RumboConfigFile::default());
    }

    match std::fs::read_to_string(&path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config file");
                Ok(config)
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config file, using defaults"
                );
                Ok(RumboConfigFile::default())
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            Ok(RumboConfigFile::default())
        }
    }
}

/// Return the config file path: `~/.config/rumbo/config.toml`
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("rumbo").join("config.toml"))
}
