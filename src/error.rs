//! Error types for Yatube.

use thiserror::Error;

/// Common error type for Yatube.
#[derive(Error, Debug)]
pub enum YatubeError {
    /// Database error.
    ///
    /// Wraps errors from the database backend. Errors from sqlx are converted
    /// automatically.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Authentication error.
    #[error("authentication error: {0}")]
    Auth(String),

    /// Permission denied error.
    #[error("permission denied: {0}")]
    Permission(String),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Template error.
    #[error("template error: {0}")]
    Template(#[from] crate::template::TemplateError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for YatubeError {
    fn from(e: sqlx::Error) -> Self {
        YatubeError::Database(e.to_string())
    }
}

/// Result type alias for Yatube operations.
pub type Result<T> = std::result::Result<T, YatubeError>;
