//! Error types for the relay

use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, RelayError>;

/// Top-level relay error
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid webhook signature")]
    InvalidSignature,

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<config::ConfigError> for RelayError {
    fn from(e: config::ConfigError) -> Self {
        RelayError::Configuration(e.to_string())
    }
}
