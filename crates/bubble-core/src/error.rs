//! Error types for the bubble engine

use thiserror::Error;

/// The main error type for bubble operations
#[derive(Debug, Error)]
pub enum BubbleError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Value out of range: {field} must be between {min} and {max}, got {value}")]
    ValueOutOfRange {
        field: String,
        min: f64,
        max: f64,
        value: f64,
    },
}

/// Result type alias for bubble operations
pub type Result<T> = std::result::Result<T, BubbleError>;

impl From<toml::de::Error> for BubbleError {
    fn from(err: toml::de::Error) -> Self {
        BubbleError::TomlParse(err.to_string())
    }
}
