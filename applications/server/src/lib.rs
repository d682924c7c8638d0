//! Needledrop Server Library
//!
//! Serves one track from a remote playlist per request, either as an
//! independent random draw or by walking a client-held shuffle queue.
//!
//! This library exposes the core components for testing purposes.

pub mod api;
pub mod config;
pub mod error;
pub mod maintenance;
pub mod state;

// Re-export commonly used types for convenience
pub use config::{SelectionMode, ServerConfig, StorageBackend};
pub use error::{Result, ServerError};
pub use state::AppState;
