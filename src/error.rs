//! Error types for Rumbo gateway

use thiserror::Error;

/// Result type alias for Rumbo operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in Rumbo gateway
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Weather lookup error
    #[error("weather error: {0}")]
    Weather(String),

    /// Chat backend error
    #[error("backend error: {0}")]
    Backend(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}
