//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Stage bounds must satisfy 3 <= min <= default <= max <= 10")]
    InvalidStageBounds,

    #[error("Invalid AI request timeout")]
    InvalidTimeout,

    #[error("Calendar event duration must be positive")]
    InvalidEventDuration,

    #[error("Invalid log filter: {0}")]
    InvalidLogFilter(String),
}
