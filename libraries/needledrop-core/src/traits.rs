/// Collaborator traits for needledrop
use crate::error::{PickError, Result};
use crate::types::PlaylistSnapshot;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

/// Key-value store trait
///
/// An eventually consistent, last-write-wins register per key. There are no
/// transactions and no read-after-write guarantee; implementers surface
/// transport failures as [`PickError::Store`].
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the text stored under `key`
    ///
    /// Returns `Ok(None)` when the key is absent or its entry has expired.
    ///
    /// # Errors
    /// Returns an error if the backend cannot be reached
    async fn get_text(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    ///
    /// With `ttl` set, the entry reads as absent once it has elapsed.
    ///
    /// # Errors
    /// Returns an error if the backend cannot be reached
    async fn put(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()>;
}

/// Read the value under `key` and deserialize it as JSON
///
/// A stored value that is not valid JSON for `T` is reported as a store error,
/// so callers that treat read failures as a miss need no extra branch.
///
/// # Errors
/// Returns an error if the read fails or the stored value does not decode
pub async fn get_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>> {
    match store.get_text(key).await? {
        Some(text) => serde_json::from_str(&text).map(Some).map_err(|e| {
            PickError::store(format!("Value under key {key} failed to decode ({e})"))
        }),
        None => Ok(None),
    }
}

/// Upstream playlist source
///
/// Implementers issue a single request per call. Timeouts and retries are
/// applied by the caller.
#[async_trait]
pub trait PlaylistOrigin: Send + Sync {
    /// Fetch and decode the playlist published at `endpoint`
    ///
    /// # Errors
    /// Returns [`PickError::UpstreamFetch`] for transport failures and
    /// [`PickError::UpstreamParse`] when the body does not match the playlist shape
    async fn fetch_playlist(&self, endpoint: &str) -> Result<PlaylistSnapshot>;
}

#[async_trait]
impl<T: PlaylistOrigin + ?Sized> PlaylistOrigin for Arc<T> {
    async fn fetch_playlist(&self, endpoint: &str) -> Result<PlaylistSnapshot> {
        (**self).fetch_playlist(endpoint).await
    }
}
