//! Error types for loc-picker

use thiserror::Error;

/// Main error type for loc-picker operations
#[derive(Error, Debug)]
pub enum Error {
    /// Latitude or longitude outside the valid range
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// Device geolocation denied, unsupported or failed
    #[error("Location unavailable: {0}")]
    LocationUnavailable(String),

    /// Forward search or reverse geocode failed
    #[error("Geocoding error: {0}")]
    Geocoding(String),

    /// Background work requested outside a tokio runtime
    #[error("Runtime error: {0}")]
    Runtime(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Server(String),
}

/// Result type alias for loc-picker operations
pub type Result<T> = std::result::Result<T, Error>;
