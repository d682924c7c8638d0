/// Server configuration
use crate::error::{Result, ServerError};
use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_origin")]
    pub origin: OriginSettings,

    #[serde(default = "default_cache")]
    pub cache: CacheSettings,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_selection")]
    pub selection: SelectionSettings,

    #[serde(default = "default_cookie")]
    pub cookie: CookieSettings,

    #[serde(default)]
    pub cors: CorsSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

/// Upstream playlist endpoint and fetch schedule
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OriginSettings {
    #[serde(default)]
    pub service_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheSettings {
    #[serde(default = "default_playlist_key")]
    pub playlist_key: String,

    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    #[serde(default = "default_last_picked_key")]
    pub last_picked_key: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default)]
    pub backend: StorageBackend,

    #[serde(default = "default_database_url")]
    pub database_url: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Sqlite,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SelectionSettings {
    #[serde(default)]
    pub mode: SelectionMode,

    /// Only consulted in random mode
    #[serde(default = "default_avoid_repeats")]
    pub avoid_repeats: bool,
}

/// How a track is chosen for each request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// Walk a per-client shuffle queue carried in a cookie
    #[default]
    Shuffle,
    /// Independent uniform draw per request
    Random,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CookieSettings {
    #[serde(default = "default_cookie_name")]
    pub name: String,

    #[serde(default = "default_cookie_max_age_secs")]
    pub max_age_secs: u64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CorsSettings {
    /// `None` allows any origin
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_origin: Option<String>,
}

impl CorsSettings {
    /// The allowed origin as a header value, reduced to `scheme://host[:port]`
    ///
    /// Returns `Ok(None)` when no origin is configured.
    pub fn origin_header(&self) -> Result<Option<HeaderValue>> {
        let Some(raw) = &self.allowed_origin else {
            return Ok(None);
        };

        let url = Url::parse(raw)
            .map_err(|e| ServerError::Config(format!("Invalid CORS origin {raw:?}: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ServerError::Config(format!(
                "CORS origin must use http or https, got {raw:?}"
            )));
        }

        let origin = url.origin().ascii_serialization();
        HeaderValue::from_str(&origin)
            .map(Some)
            .map_err(|e| ServerError::Config(format!("Invalid CORS origin {raw:?}: {e}")))
    }
}

impl ServerConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; otherwise `config.toml` in the working
    /// directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let config_path = PathBuf::from("config.toml");
                if config_path.exists() {
                    settings = settings.add_source(config::File::from(config_path));
                }
            }
        }

        // Override with environment variables, e.g. NEEDLEDROP__ORIGIN__SERVICE_URL
        settings = settings.add_source(
            config::Environment::with_prefix("NEEDLEDROP")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.origin.service_url.is_empty() {
            return Err(ServerError::Config(
                "Origin URL is required (set NEEDLEDROP__ORIGIN__SERVICE_URL)".to_string(),
            ));
        }

        let url = Url::parse(&self.origin.service_url).map_err(|e| {
            ServerError::Config(format!(
                "Invalid origin URL {}: {e}",
                self.origin.service_url
            ))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ServerError::Config(format!(
                "Origin URL must use http or https, got {}",
                url.scheme()
            )));
        }

        if self.origin.timeout_secs == 0 {
            return Err(ServerError::Config(
                "origin.timeout_secs must be greater than zero".to_string(),
            ));
        }

        if self.cache.ttl_secs == 0 {
            return Err(ServerError::Config(
                "cache.ttl_secs must be greater than zero".to_string(),
            ));
        }

        if self.cookie.name.trim().is_empty() {
            return Err(ServerError::Config("cookie.name must not be empty".to_string()));
        }

        self.cors.origin_header()?;

        Ok(())
    }

    /// Settings for the playlist cache manager
    pub fn cache_settings(&self) -> needledrop_cache::CacheSettings {
        needledrop_cache::CacheSettings {
            key: self.cache.playlist_key.clone(),
            ttl: Duration::from_secs(self.cache.ttl_secs),
            fetch_timeout: Duration::from_secs(self.origin.timeout_secs),
            retry: needledrop_cache::RetryPolicy::new(
                self.origin.max_retries,
                Duration::from_millis(self.origin.initial_backoff_ms),
            ),
        }
    }

    /// Transport settings for the origin client
    pub fn origin_settings(&self) -> needledrop_origin::OriginSettings {
        needledrop_origin::OriginSettings::new(self.origin.user_agent.clone())
    }
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings {
        host: default_host(),
        port: default_port(),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_origin() -> OriginSettings {
    OriginSettings {
        service_url: String::new(),
        timeout_secs: default_timeout_secs(),
        max_retries: default_max_retries(),
        initial_backoff_ms: default_initial_backoff_ms(),
        user_agent: default_user_agent(),
    }
}

fn default_timeout_secs() -> u64 {
    4
}

fn default_max_retries() -> u32 {
    2
}

fn default_initial_backoff_ms() -> u64 {
    1000
}

fn default_user_agent() -> String {
    format!("needledrop/{}", env!("CARGO_PKG_VERSION"))
}

fn default_cache() -> CacheSettings {
    CacheSettings {
        playlist_key: default_playlist_key(),
        ttl_secs: default_ttl_secs(),
        last_picked_key: default_last_picked_key(),
    }
}

fn default_playlist_key() -> String {
    "playlist".to_string()
}

fn default_ttl_secs() -> u64 {
    3600
}

fn default_last_picked_key() -> String {
    "last-picked".to_string()
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        backend: StorageBackend::default(),
        database_url: default_database_url(),
    }
}

fn default_database_url() -> String {
    "sqlite://./data/needledrop.db".to_string()
}

fn default_selection() -> SelectionSettings {
    SelectionSettings {
        mode: SelectionMode::default(),
        avoid_repeats: default_avoid_repeats(),
    }
}

fn default_avoid_repeats() -> bool {
    true
}

fn default_cookie() -> CookieSettings {
    CookieSettings {
        name: default_cookie_name(),
        max_age_secs: default_cookie_max_age_secs(),
    }
}

fn default_cookie_name() -> String {
    "shuffle_queue".to_string()
}

fn default_cookie_max_age_secs() -> u64 {
    // 30 days
    2_592_000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            origin: default_origin(),
            cache: default_cache(),
            storage: default_storage(),
            selection: default_selection(),
            cookie: default_cookie(),
            cors: CorsSettings::default(),
        }
    }
}
