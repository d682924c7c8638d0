/// Shared application state
use crate::config::ServerConfig;
use needledrop_cache::PlaylistCache;
use needledrop_core::KeyValueStore;
use std::sync::Arc;

/// Application state shared across all handlers
///
/// Everything here is read-only; per-client shuffle state travels in the
/// request cookie instead.
#[derive(Clone)]
pub struct AppState {
    pub playlist_cache: Arc<PlaylistCache>,
    pub store: Arc<dyn KeyValueStore>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(
        playlist_cache: Arc<PlaylistCache>,
        store: Arc<dyn KeyValueStore>,
        config: Arc<ServerConfig>,
    ) -> Self {
        Self {
            playlist_cache,
            store,
            config,
        }
    }
}
