use async_trait::async_trait;
use needledrop_core::{PickError, PlaylistOrigin, PlaylistSnapshot, Result};
use std::time::Duration;

/// Timeout decorator for playlist origins
///
/// The inner request is dropped, and so cancelled, once the timeout elapses.
pub struct TimeoutOrigin<O> {
    inner: O,
    timeout: Duration,
}

impl<O: PlaylistOrigin> TimeoutOrigin<O> {
    pub fn new(inner: O, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

#[async_trait]
impl<O: PlaylistOrigin> PlaylistOrigin for TimeoutOrigin<O> {
    async fn fetch_playlist(&self, endpoint: &str) -> Result<PlaylistSnapshot> {
        tokio::time::timeout(self.timeout, self.inner.fetch_playlist(endpoint))
            .await
            .map_err(|_| {
                PickError::upstream_fetch(format!(
                    "Origin did not respond within {}ms",
                    self.timeout.as_millis()
                ))
            })?
    }
}
