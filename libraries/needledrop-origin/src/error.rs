//! Error types for the origin client.

use needledrop_core::PickError;
use thiserror::Error;

/// Errors that can occur when fetching the upstream playlist.
#[derive(Error, Debug)]
pub enum OriginError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Origin returned a non-success status
    #[error("Origin error ({status}): {message}")]
    Status { status: u16, message: String },

    /// Body did not match the playlist shape
    #[error("Failed to parse playlist: {0}")]
    Parse(String),

    /// Endpoint is not an absolute http(s) URL
    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(String),
}

/// Result type for origin client operations.
pub type Result<T> = std::result::Result<T, OriginError>;

impl From<OriginError> for PickError {
    fn from(err: OriginError) -> Self {
        match err {
            OriginError::Parse(_) => PickError::upstream_parse(err.to_string()),
            OriginError::Request(_) | OriginError::Status { .. } | OriginError::InvalidUrl(_) => {
                PickError::upstream_fetch(err.to_string())
            }
        }
    }
}
