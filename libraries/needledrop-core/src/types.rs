//! Playlist domain types
//!
//! Field names follow the origin's camelCase JSON document. Every field is
//! required; `preview_url` must be present but may be `null`. Unknown fields
//! are ignored.

use serde::{Deserialize, Serialize};

/// A single playable track as published by the origin playlist.
///
/// `uri` identifies the track within one snapshot. Tracks are immutable once
/// fetched; the only derived field is `artist`, recomputed for display by
/// [`crate::format_artists`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Unique identifier within a snapshot
    pub uri: String,

    /// Track title
    pub title: String,

    /// Display string for the contributing artists
    pub artist: String,

    /// Duration as reported by the origin
    pub duration: f64,

    /// Explicit content flag
    pub is_explicit: bool,

    /// Audio preview location, when the origin has one
    #[serde(deserialize_with = "Option::deserialize")]
    pub preview_url: Option<String>,

    /// Cover art location
    pub cover_url: String,

    /// Ordered list of contributor names
    pub artists: Vec<String>,
}

/// Informational counters published alongside the tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistMeta {
    /// Number of embedded entries the origin resolved
    pub embed_count: u64,

    /// Number of entries with rich metadata
    pub rich_info_count: u64,
}

/// An immutable, fully resolved playlist document.
///
/// Track order is significant: shuffle state indexes into this exact order.
/// Snapshots are replaced wholesale on refresh and never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistSnapshot {
    /// Informational counters
    pub meta: PlaylistMeta,

    /// Tracks in origin order
    pub tracks: Vec<Track>,
}

impl PlaylistSnapshot {
    /// Number of tracks in the snapshot
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether the snapshot has no tracks
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
