//! Origin playlist client.

use crate::error::{OriginError, Result};
use crate::types::OriginSettings;
use async_trait::async_trait;
use needledrop_core::{PickError, PlaylistOrigin, PlaylistSnapshot};
use reqwest::Client;
use tracing::debug;
use url::Url;

/// Client for the upstream playlist endpoint.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct OriginClient {
    http: Client,
}

impl OriginClient {
    /// Create a new client with the given settings.
    pub fn new(settings: OriginSettings) -> Result<Self> {
        let http = Client::builder()
            .connect_timeout(settings.connect_timeout)
            .user_agent(settings.user_agent)
            .build()?;

        Ok(Self { http })
    }

    /// Check that `endpoint` is an absolute http(s) URL.
    pub fn validate_endpoint(endpoint: &str) -> Result<Url> {
        if endpoint.is_empty() {
            return Err(OriginError::InvalidUrl("URL cannot be empty".into()));
        }

        let url = Url::parse(endpoint).map_err(|e| OriginError::InvalidUrl(e.to_string()))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            scheme => Err(OriginError::InvalidUrl(format!(
                "URL must start with http:// or https:// (got {scheme}://)"
            ))),
        }
    }

    /// Fetch the playlist document with a single `GET`.
    pub async fn fetch(&self, endpoint: &str) -> Result<PlaylistSnapshot> {
        let url = Self::validate_endpoint(endpoint)?;
        debug!(url = %url, "Fetching playlist from origin");

        let response = self.http.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(OriginError::Status {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let body = response.bytes().await?;
        let playlist: PlaylistSnapshot = serde_json::from_slice(&body)
            .map_err(|e| OriginError::Parse(e.to_string()))?;

        debug!(tracks = playlist.tracks.len(), "Fetched playlist");

        Ok(playlist)
    }
}

#[async_trait]
impl PlaylistOrigin for OriginClient {
    async fn fetch_playlist(&self, endpoint: &str) -> needledrop_core::Result<PlaylistSnapshot> {
        self.fetch(endpoint).await.map_err(PickError::from)
    }
}
