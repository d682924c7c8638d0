//! needledrop core
//!
//! Platform-agnostic building blocks shared by every needledrop crate.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `PlaylistMeta`, `PlaylistSnapshot`
//! - **Collaborator Traits**: `KeyValueStore` (cache backend) and `PlaylistOrigin` (upstream fetch)
//! - **Error Handling**: the closed `PickError` taxonomy and `Result` alias
//! - **Formatting**: artist display strings and the JSON error body
//!
//! # Example
//!
//! ```rust
//! use needledrop_core::{format_artists, Track};
//!
//! let track = Track {
//!     uri: "spotify:track:1".to_string(),
//!     title: "Song".to_string(),
//!     artist: String::new(),
//!     duration: 215_000.0,
//!     is_explicit: false,
//!     preview_url: None,
//!     cover_url: "https://img.example.com/1.jpg".to_string(),
//!     artists: vec!["A".to_string(), "B".to_string(), "C".to_string()],
//! };
//!
//! assert_eq!(format_artists(track).artist, "A, B & C");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod format;
pub mod traits;
pub mod types;

pub use error::{PickError, Result};
pub use format::{format_artists, to_error_body, ErrorBody};
pub use traits::{get_json, KeyValueStore, PlaylistOrigin};
pub use types::{PlaylistMeta, PlaylistSnapshot, Track};
