//! Configuration management for Rumbo gateway
//!
//! Precedence, lowest to highest: built-in defaults, then the TOML config
//! file, then environment variables.

pub mod file;

use std::path::Path;
use std::time::Duration;

use crate::notify::NotificationRules;
use crate::scanner::ScannerConfig;
use crate::Result;

/// Default OpenWeatherMap current-weather endpoint
pub const DEFAULT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Default Toqan chat endpoint
pub const DEFAULT_BACKEND_URL: &str = "https://api.toqan.ai/v1/chat";

/// Rumbo gateway configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API server port
    pub port: u16,

    /// Weather API settings
    pub weather: WeatherConfig,

    /// Chat backend settings
    pub backend: BackendConfig,

    /// Notification rule thresholds
    pub notifications: NotificationRules,

    /// Background scanner cadence
    pub scanner: ScannerConfig,
}

/// Weather API settings
#[derive(Debug, Clone)]
pub struct WeatherConfig {
    /// Current-weather endpoint URL
    pub api_url: String,

    /// API key (from `WEATHER_API_KEY` env or config file)
    pub api_key: Option<String>,

    /// Request timeout
    pub timeout: Duration,
}

/// Chat backend settings
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Chat endpoint URL
    pub api_url: String,

    /// API key (from `TOQAN_API_KEY` env or config file); the backend is
    /// disabled when absent and every reply comes from the composer
    pub api_key: Option<String>,

    /// Workspace/space identifier sent with each request
    pub space_id: Option<String>,

    /// Request timeout
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            weather: WeatherConfig {
                api_url: DEFAULT_WEATHER_URL.to_string(),
                api_key: None,
                timeout: Duration::from_secs(5),
            },
            backend: BackendConfig {
                api_url: DEFAULT_BACKEND_URL.to_string(),
                api_key: None,
                space_id: None,
                timeout: Duration::from_secs(15),
            },
            notifications: NotificationRules::default(),
            scanner: ScannerConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration: defaults, then config file, then environment
    ///
    /// # Errors
    ///
    /// Returns an error when an explicitly given config path can't be read
    /// or parsed.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let file = file::load_config_file(config_path)?;
        let mut config = Self::default().merged_with(file);
        config.apply_env();
        Ok(config)
    }

    /// Overlay a parsed config file onto this configuration
    #[must_use]
    pub fn merged_with(mut self, file: file::RumboConfigFile) -> Self {
        if let Some(port) = file.server.port {
            self.port = port;
        }

        if let Some(url) = file.weather.api_url {
            self.weather.api_url = url;
        }
        if file.weather.api_key.is_some() {
            self.weather.api_key = file.weather.api_key;
        }
        if let Some(secs) = file.weather.timeout_secs {
            self.weather.timeout = Duration::from_secs(secs);
        }

        if let Some(url) = file.backend.api_url {
            self.backend.api_url = url;
        }
        if file.backend.api_key.is_some() {
            self.backend.api_key = file.backend.api_key;
        }
        if file.backend.space_id.is_some() {
            self.backend.space_id = file.backend.space_id;
        }
        if let Some(secs) = file.backend.timeout_secs {
            self.backend.timeout = Duration::from_secs(secs);
        }

        if let Some(v) = file.notifications.temperature_low_c {
            self.notifications.temperature_low_c = v;
        }
        if let Some(v) = file.notifications.temperature_high_c {
            self.notifications.temperature_high_c = v;
        }
        if let Some(v) = file.notifications.rain_probability_pct {
            self.notifications.rain_probability_pct = v;
        }
        if let Some(hours) = file.notifications.trigger_hours {
            self.notifications.trigger_hours = hours;
        }

        if let Some(secs) = file.scanner.interval_secs {
            self.scanner.interval = Duration::from_secs(secs);
        }
        if let Some(secs) = file.scanner.active_window_secs {
            self.scanner.active_window = chrono::Duration::seconds(secs);
        }
        if let Some(secs) = file.scanner.evict_after_secs {
            self.scanner.evict_after = chrono::Duration::seconds(secs);
        }

        self
    }

    /// Apply environment variable overrides
    fn apply_env(&mut self) {
        if let Ok(port) = std::env::var("RUMBO_PORT") {
            match port.parse() {
                Ok(port) => self.port = port,
                Err(e) => tracing::warn!(value = %port, error = %e, "invalid RUMBO_PORT"),
            }
        }

        if let Ok(url) = std::env::var("WEATHER_API_URL") {
            self.weather.api_url = url;
        }
        if let Ok(key) = std::env::var("WEATHER_API_KEY") {
            self.weather.api_key = Some(key);
        }

        if let Ok(url) = std::env::var("TOQAN_API_URL") {
            self.backend.api_url = url;
        }
        if let Ok(key) = std::env::var("TOQAN_API_KEY") {
            self.backend.api_key = Some(key);
        }
        if let Ok(space) = std::env::var("TOQAN_SPACE_ID") {
            self.backend.space_id = Some(space);
        }
    }
}
