//! needledrop - Track Selection
//!
//! Picks one track per request from a resolved playlist snapshot.
//!
//! This crate provides:
//! - Uniform random selection backed by the operating system's CSPRNG
//! - Repeat avoidance through a single "last picked" marker in the key-value store
//! - A shuffle queue whose cursor lives with the client as an opaque token
//! - Playlist fingerprinting so a queue is rebuilt when the upstream order changes
//!
//! # Architecture
//!
//! The shuffle queue keeps no server-side state. Each call decodes the
//! caller's token, advances it, and hands back a new token; any failure along
//! the way degrades to a single uniform pick and tells the caller to drop its
//! token.
//!
//! # Example: Shuffle Queue
//!
//! ```rust
//! use needledrop_playback::next_track;
//! # use needledrop_core::Track;
//! # let tracks: Vec<Track> = (0..3)
//! #     .map(|i| Track {
//! #         uri: format!("spotify:track:{i}"),
//! #         title: format!("Song {i}"),
//! #         artist: "A".into(),
//! #         duration: 1.0,
//! #         is_explicit: false,
//! #         preview_url: None,
//! #         cover_url: String::new(),
//! #         artists: vec!["A".into()],
//! #     })
//! #     .collect();
//!
//! let first = next_track(&tracks, None).unwrap();
//! assert_eq!(first.status.unwrap().to_string(), "1/3");
//!
//! let second = next_track(&tracks, first.token.as_deref()).unwrap();
//! assert_eq!(second.status.unwrap().to_string(), "2/3");
//! ```

mod queue;
mod random;
mod shuffle;

// Public exports
pub use queue::{
    next_track, QueuePick, QueueStatus, ShuffleQueueState, MAX_QUEUE_TRACKS, MAX_TOKEN_BYTES,
};
pub use random::{pick_avoiding_last, pick_uniform, random_index};
pub use shuffle::{playlist_fingerprint, shuffled_indexes, FINGERPRINT_LEN};
