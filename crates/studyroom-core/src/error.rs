//! Core error types for studyroom-core.
//!
//! This module defines the error hierarchy using thiserror. Timer operations
//! are total apart from `start()`, so the session branch is small; most of
//! the surface covers configuration I/O.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for studyroom-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Session/timer errors
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Errors reported synchronously by the session timer and its inputs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// A focus or break duration was not strictly positive.
    #[error("Invalid session configuration: '{field}' must be greater than zero (got {value})")]
    InvalidConfiguration { field: &'static str, value: u64 },

    /// No template with the requested id exists.
    #[error("Unknown session template: {0}")]
    UnknownTemplate(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration tree
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_configuration_message_names_field() {
        let err = SessionError::InvalidConfiguration {
            field: "focus_secs",
            value: 0,
        };
        let msg = err.to_string();
        assert!(msg.contains("focus_secs"));
        assert!(msg.contains("got 0"));
    }

    #[test]
    fn session_error_converts_into_core_error() {
        let core: CoreError = SessionError::UnknownTemplate("nope".into()).into();
        assert!(matches!(core, CoreError::Session(SessionError::UnknownTemplate(_))));
        assert_eq!(core.to_string(), "Session error: Unknown session template: nope");
    }
}
