//! Error types for the Tidal backend.

use soul_directory::DirectoryError;
use thiserror::Error;

/// Errors talking to the catalog helper
#[derive(Error, Debug)]
pub enum TidalError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Helper answered with a non-success status
    #[error("Helper error ({status}): {message}")]
    Helper { status: u16, message: String },

    /// Failed to parse helper response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Invalid helper URL
    #[error("Invalid helper URL: {0}")]
    InvalidUrl(String),

    /// Request for a path the backend doesn't serve
    #[error("No such resource: {0}")]
    NotFound(String),
}

/// Result type for Tidal backend operations.
pub type Result<T> = std::result::Result<T, TidalError>;

impl From<TidalError> for DirectoryError {
    fn from(err: TidalError) -> Self {
        DirectoryError::backend(crate::BACKEND_NAME, err.to_string())
    }
}
