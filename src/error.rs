//! Error types for Docstate

use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Validation error (caller input missing or malformed)
    #[error("{0}")]
    Validation(String),

    /// Record store error
    #[error("Store error: {0}")]
    Store(String),

    /// Blocking task failed to complete
    #[error("Task error: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// API error
    #[error("API error: {0}")]
    Api(String),
}

/// Result type alias for Core operations
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Whether this error was caused by the caller rather than the service
    pub fn is_client_error(&self) -> bool {
        matches!(self, CoreError::Validation(_))
    }
}
