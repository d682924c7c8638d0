//! Playlist cache manager

use crate::retry::{RetryOrigin, RetryPolicy};
use crate::timeout::TimeoutOrigin;
use needledrop_core::{KeyValueStore, PickError, PlaylistOrigin, PlaylistSnapshot, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Cache and fetch settings
#[derive(Debug, Clone)]
pub struct CacheSettings {
    /// Store key holding the serialized snapshot (one per deployment)
    pub key: String,
    /// Lifetime of a cached snapshot
    pub ttl: Duration,
    /// Bound on a single origin attempt
    pub fetch_timeout: Duration,
    /// Backoff schedule for failed attempts
    pub retry: RetryPolicy,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            key: "playlist".to_string(),
            ttl: Duration::from_secs(3600),
            fetch_timeout: Duration::from_secs(4),
            retry: RetryPolicy::default(),
        }
    }
}

/// Outcome of reading the cache entry
#[derive(Debug)]
enum CacheRead {
    Hit(PlaylistSnapshot),
    Miss,
    /// Stored value does not decode as a snapshot
    Invalid(String),
    /// The store itself failed
    Unavailable(PickError),
}

/// Resolves the playlist from the cache entry or, on a miss, from the origin.
///
/// Holds no mutable state of its own; concurrent cold misses may both fetch
/// and both write, which the last-write-wins store tolerates.
pub struct PlaylistCache {
    store: Arc<dyn KeyValueStore>,
    origin: RetryOrigin<TimeoutOrigin<Arc<dyn PlaylistOrigin>>>,
    key: String,
    ttl: Duration,
}

impl PlaylistCache {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        origin: Arc<dyn PlaylistOrigin>,
        settings: CacheSettings,
    ) -> Self {
        let origin = RetryOrigin::new(
            TimeoutOrigin::new(origin, settings.fetch_timeout),
            settings.retry,
        );

        Self {
            store,
            origin,
            key: settings.key,
            ttl: settings.ttl,
        }
    }

    /// Resolve the current playlist for `endpoint`.
    ///
    /// # Errors
    /// - [`PickError::UpstreamFetch`] when every origin attempt failed or timed out
    /// - [`PickError::UpstreamParse`] when the origin payload has the wrong shape
    /// - [`PickError::EmptyPlaylist`] when the resolved snapshot has no tracks
    pub async fn get_playlist(&self, endpoint: &str) -> Result<PlaylistSnapshot> {
        let playlist = match self.read_cached().await {
            Some(playlist) => playlist,
            None => self.refresh(endpoint).await?,
        };

        if playlist.is_empty() {
            return Err(PickError::empty_playlist());
        }

        Ok(playlist)
    }

    async fn read_cached(&self) -> Option<PlaylistSnapshot> {
        match self.lookup().await {
            CacheRead::Hit(playlist) => {
                debug!(key = %self.key, tracks = playlist.tracks.len(), "Cache was valid, returning");
                Some(playlist)
            }
            CacheRead::Miss => {
                debug!(key = %self.key, "Playlist not cached");
                None
            }
            CacheRead::Invalid(reason) => {
                warn!(key = %self.key, error = %reason, "Cache was invalid, failed to parse");
                None
            }
            CacheRead::Unavailable(e) => {
                warn!(key = %self.key, error = %e, "Cache read failed, treating as a miss");
                None
            }
        }
    }

    async fn lookup(&self) -> CacheRead {
        let text = match self.store.get_text(&self.key).await {
            Ok(Some(text)) => text,
            Ok(None) => return CacheRead::Miss,
            Err(e) => return CacheRead::Unavailable(e),
        };

        match serde_json::from_str(&text) {
            Ok(playlist) => CacheRead::Hit(playlist),
            Err(e) => CacheRead::Invalid(e.to_string()),
        }
    }

    async fn refresh(&self, endpoint: &str) -> Result<PlaylistSnapshot> {
        let playlist = self.origin.fetch_playlist(endpoint).await?;
        info!(tracks = playlist.tracks.len(), "Fetched fresh playlist");

        match serde_json::to_string(&playlist) {
            Ok(encoded) => {
                if let Err(e) = self.store.put(&self.key, &encoded, Some(self.ttl)).await {
                    warn!(key = %self.key, error = %e, "Failed to cache playlist");
                }
            }
            Err(e) => warn!(error = %e, "Failed to encode playlist for the cache"),
        }

        Ok(playlist)
    }
}
