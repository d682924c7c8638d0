/// Common test utilities and fixtures
use async_trait::async_trait;
use needledrop_cache::PlaylistCache;
use needledrop_core::{
    KeyValueStore, PickError, PlaylistMeta, PlaylistOrigin, PlaylistSnapshot, Result, Track,
};
use needledrop_server::{api, state::AppState, ServerConfig};
use needledrop_storage::MemoryStore;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub const SERVICE_URL: &str = "https://playlist.example.com/";

/// Build a track with the given artists
pub fn track(id: usize, artists: &[&str]) -> Track {
    Track {
        uri: format!("spotify:track:{id}"),
        title: format!("Track {id}"),
        artist: "unformatted".to_string(),
        duration: 180_000.0,
        is_explicit: false,
        preview_url: Some(format!("https://p.example.com/{id}.mp3")),
        cover_url: format!("https://img.example.com/{id}.jpg"),
        artists: artists.iter().map(|a| (*a).to_string()).collect(),
    }
}

pub fn playlist(count: usize) -> PlaylistSnapshot {
    PlaylistSnapshot {
        meta: PlaylistMeta {
            embed_count: count as u64,
            rich_info_count: count as u64,
        },
        tracks: (0..count).map(|i| track(i, &["Artist"])).collect(),
    }
}

/// Origin returning a fixed response and counting calls
pub struct FixedOrigin {
    response: Result<PlaylistSnapshot>,
    calls: AtomicUsize,
}

impl FixedOrigin {
    pub fn ok(playlist: PlaylistSnapshot) -> Arc<Self> {
        Arc::new(Self {
            response: Ok(playlist),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(error: PickError) -> Arc<Self> {
        Arc::new(Self {
            response: Err(error),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PlaylistOrigin for FixedOrigin {
    async fn fetch_playlist(&self, _endpoint: &str) -> Result<PlaylistSnapshot> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response.clone()
    }
}

/// Config pointing at the test origin URL with defaults elsewhere
pub fn test_config() -> ServerConfig {
    let mut config = ServerConfig::default();
    config.origin.service_url = SERVICE_URL.to_string();
    config
}

/// Assemble app state over an in-memory store
pub fn create_test_state(
    config: ServerConfig,
    origin: Arc<dyn PlaylistOrigin>,
) -> (AppState, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let kv: Arc<dyn KeyValueStore> = store.clone();
    let playlist_cache = Arc::new(PlaylistCache::new(
        Arc::clone(&kv),
        origin,
        config.cache_settings(),
    ));

    (AppState::new(playlist_cache, kv, Arc::new(config)), store)
}

/// Assemble a router over an in-memory store
pub fn create_test_app(
    config: ServerConfig,
    origin: Arc<dyn PlaylistOrigin>,
) -> (axum::Router, Arc<MemoryStore>) {
    let (app_state, store) = create_test_state(config, origin);
    (api::create_router(app_state).unwrap(), store)
}
