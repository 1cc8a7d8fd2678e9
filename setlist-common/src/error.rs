//! Common error types for Setlist

use thiserror::Error;

/// Common result type for Setlist operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared by the service and the editor core
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found (or not owned by the caller)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Missing or expired session, or ownership mismatch
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Remote store failure reported to the editor core
    #[error("Remote store error: {0}")]
    Remote(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
