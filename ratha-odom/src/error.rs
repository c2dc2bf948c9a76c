//! Error types for RathaOdom

use thiserror::Error;

/// RathaOdom error type
#[derive(Error, Debug)]
pub enum RathaError {
    /// Wheel radius, separation or wheelbase out of range
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Tuning parameter out of range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<basic_toml::Error> for RathaError {
    fn from(e: basic_toml::Error) -> Self {
        RathaError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RathaError>;
