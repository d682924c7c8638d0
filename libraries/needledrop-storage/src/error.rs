/// Storage-specific errors
use thiserror::Error;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// Stored timestamp or TTL outside the representable range
    #[error("Invalid expiry: {0}")]
    InvalidExpiry(String),

    /// Migration error
    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Database error from `SQLx`
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl From<StorageError> for needledrop_core::PickError {
    fn from(err: StorageError) -> Self {
        needledrop_core::PickError::store(err.to_string())
    }
}
