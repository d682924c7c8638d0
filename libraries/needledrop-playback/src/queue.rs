//! Client-held shuffle queue
//!
//! The queue state travels with the client as an opaque token (JSON, then
//! base64url). Every call decodes the token, advances the cursor and
//! re-encodes it. Invariants checked on decode:
//! - `shuffled_indexes` is a permutation of `0..tracks.len()`
//! - `current_index <= shuffled_indexes.len()`

use crate::random::pick_uniform;
use crate::shuffle::{playlist_fingerprint, shuffled_indexes};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use needledrop_core::{PickError, Result, Track};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// Largest token a client is expected to hand back (browser cookie limit)
///
/// With JSON wrapped in base64url this fits a queue of at most
/// [`MAX_QUEUE_TRACKS`] tracks. Longer playlists never get a token, so every
/// shuffle request on them falls back to a uniform pick without a status.
pub const MAX_TOKEN_BYTES: usize = 4096;

/// Longest playlist whose queue token stays within [`MAX_TOKEN_BYTES`]
///
/// Holds for every cursor position: at 777 tracks the exhausted state
/// encodes to exactly 4096 bytes.
pub const MAX_QUEUE_TRACKS: usize = 777;

/// Cursor over a permutation of track positions for one playlist snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShuffleQueueState {
    /// Fingerprint of the snapshot the permutation was built against
    pub playlist_hash: String,

    /// Permutation of `0..n`
    pub shuffled_indexes: Vec<usize>,

    /// Next position to serve; equal to the length once exhausted
    pub current_index: usize,
}

impl ShuffleQueueState {
    /// Fresh queue over `tracks` with the cursor at the start
    pub fn new(tracks: &[Track]) -> Self {
        Self {
            playlist_hash: playlist_fingerprint(tracks),
            shuffled_indexes: shuffled_indexes(tracks.len()),
            current_index: 0,
        }
    }

    /// Decode a client token
    ///
    /// # Errors
    /// Returns [`PickError::StateDecode`] if the token is not base64url JSON of this shape
    pub fn decode(token: &str) -> Result<Self> {
        let bytes = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|e| PickError::state_decode(format!("Token is not base64url ({e})")))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| PickError::state_decode(format!("Token is not a queue state ({e})")))
    }

    /// Encode into a cookie-safe token
    ///
    /// # Errors
    /// Returns [`PickError::StateEncode`] if serialization fails or the token
    /// exceeds [`MAX_TOKEN_BYTES`]
    pub fn encode(&self) -> Result<String> {
        let json = serde_json::to_vec(self)
            .map_err(|e| PickError::state_encode(format!("Failed to serialize queue ({e})")))?;
        let token = URL_SAFE_NO_PAD.encode(json);
        if token.len() > MAX_TOKEN_BYTES {
            return Err(PickError::state_encode(format!(
                "Token is {} bytes, limit is {MAX_TOKEN_BYTES}",
                token.len()
            )));
        }
        Ok(token)
    }

    /// Check the state is a valid cursor over `track_count` tracks
    ///
    /// # Errors
    /// Returns [`PickError::StateDecode`] describing the first violated invariant
    pub fn validate(&self, track_count: usize) -> Result<()> {
        if self.shuffled_indexes.len() != track_count {
            return Err(PickError::state_decode(format!(
                "Queue covers {} tracks, playlist has {track_count}",
                self.shuffled_indexes.len()
            )));
        }
        if self.current_index > self.shuffled_indexes.len() {
            return Err(PickError::state_decode(format!(
                "Cursor {} is past the end of the queue",
                self.current_index
            )));
        }

        let mut seen = vec![false; track_count];
        for &index in &self.shuffled_indexes {
            match seen.get_mut(index) {
                Some(slot) if !*slot => *slot = true,
                Some(_) => {
                    return Err(PickError::state_decode(format!("Index {index} repeats")));
                }
                None => {
                    return Err(PickError::state_decode(format!("Index {index} out of range")));
                }
            }
        }
        Ok(())
    }

    /// Whether every position has been served
    pub fn is_exhausted(&self) -> bool {
        self.current_index >= self.shuffled_indexes.len()
    }

    /// Cursor position for display
    pub fn status(&self) -> QueueStatus {
        QueueStatus {
            position: self.current_index,
            total: self.shuffled_indexes.len(),
        }
    }

    /// Serve the next position, reshuffling first if the queue is exhausted
    fn advance(&mut self) -> Option<usize> {
        if self.is_exhausted() {
            self.shuffled_indexes = shuffled_indexes(self.shuffled_indexes.len());
            self.current_index = 0;
        }
        let index = self.shuffled_indexes.get(self.current_index).copied()?;
        self.current_index += 1;
        Some(index)
    }
}

/// Queue progress, rendered as `position/total`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueStatus {
    /// Tracks served from the current permutation
    pub position: usize,
    /// Permutation length
    pub total: usize,
}

impl fmt::Display for QueueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.position, self.total)
    }
}

/// Result of one shuffle-queue step
#[derive(Debug, Clone, PartialEq)]
pub struct QueuePick {
    /// Track to serve
    pub track: Track,

    /// Token to hand back to the client; `None` means the client's token must be cleared
    pub token: Option<String>,

    /// Queue progress; `None` when the pick came from the random fallback
    pub status: Option<QueueStatus>,
}

impl QueuePick {
    /// Whether the shuffle queue was bypassed for this pick
    pub fn is_fallback(&self) -> bool {
        self.status.is_none()
    }
}

/// Serve the next track of the client's shuffle queue.
///
/// A missing token, or one built against a different playlist, starts a fresh
/// queue. A token that fails to decode or validate, or a state that fails to
/// encode, degrades to one uniform random pick with the token cleared.
///
/// # Errors
/// Returns [`PickError::NoTracksAvailable`] when `tracks` is empty
pub fn next_track(tracks: &[Track], token: Option<&str>) -> Result<QueuePick> {
    if tracks.is_empty() {
        return Err(PickError::no_tracks());
    }

    match advance_queue(tracks, token) {
        Ok(pick) => Ok(pick),
        Err(e) => {
            warn!(kind = e.tag(), error = %e, "Shuffle queue unavailable, serving a random track");
            Ok(QueuePick {
                track: pick_uniform(tracks)?.clone(),
                token: None,
                status: None,
            })
        }
    }
}

fn advance_queue(tracks: &[Track], token: Option<&str>) -> Result<QueuePick> {
    let hash = playlist_fingerprint(tracks);
    let existing = token.map(ShuffleQueueState::decode).transpose()?;

    let mut state = match existing {
        Some(state) if state.playlist_hash == hash => {
            state.validate(tracks.len())?;
            state
        }
        Some(state) => {
            debug!(old = %state.playlist_hash, new = %hash, "Playlist changed, rebuilding shuffle queue");
            ShuffleQueueState::new(tracks)
        }
        None => ShuffleQueueState::new(tracks),
    };

    let track = state
        .advance()
        .and_then(|index| tracks.get(index))
        .ok_or_else(|| PickError::state_decode("Cursor does not point at a track"))?
        .clone();
    let status = state.status();
    debug!(uri = %track.uri, status = %status, "Advanced shuffle queue");

    Ok(QueuePick {
        track,
        token: Some(state.encode()?),
        status: Some(status),
    })
}
