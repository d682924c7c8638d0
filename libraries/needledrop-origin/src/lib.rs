//! needledrop origin client
//!
//! HTTP client for the upstream service that publishes the playlist document.
//!
//! One call to [`OriginClient::fetch`] issues exactly one `GET`. Timeouts
//! per attempt and retries belong to the caller (see `needledrop-cache`), so
//! this crate stays a thin transport adapter.
//!
//! # Example
//!
//! ```ignore
//! use needledrop_origin::{OriginClient, OriginSettings};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = OriginClient::new(OriginSettings::default())?;
//!     let playlist = client.fetch("https://playlist.example.com/").await?;
//!     println!("Found {} tracks", playlist.tracks.len());
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod types;

pub use client::OriginClient;
pub use error::{OriginError, Result};
pub use types::OriginSettings;
