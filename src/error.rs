//! Error types for configuration, scenarios and the CLI surface.
//!
//! The coordination core (hub, contexts, store) is infallible; these cover
//! the layers that read files and user input.

use thiserror::Error;

/// Scenario-related errors
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("Failed to parse scenario: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Unknown parent context: {0}")]
    UnknownParent(String),

    #[error("Unknown context: {0}")]
    UnknownContext(String),

    #[error("Context already exists: {0}")]
    DuplicateContext(String),

    #[error("Context already destroyed: {0}")]
    ContextDestroyed(String),

    #[error("Unknown reducer '{name}' (available: {available})")]
    UnknownReducer { name: String, available: String },

    #[error("Invalid context key '{0}': keys must be non-empty and must not contain '/' or the hub delimiter")]
    InvalidKey(String),
}

/// Top-level errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid configuration: {}", .0.join("; "))]
    InvalidConfig(Vec<String>),

    #[error("Scenario error: {0}")]
    ScenarioError(#[from] ScenarioError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Logging error: {0}")]
    LoggingError(String),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
