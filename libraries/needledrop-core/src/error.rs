/// Core error types for needledrop
use thiserror::Error;

/// Result type alias using `PickError`
pub type Result<T> = std::result::Result<T, PickError>;

/// Every failure kind the playlist and selection pipeline can produce.
///
/// The set is closed: callers match on it exhaustively and decide per kind
/// whether to recover locally or surface the failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PickError {
    /// Key-value store get/put failed
    #[error("Store error: {0}")]
    Store(String),

    /// Origin request timed out or failed in transport
    #[error("Upstream fetch error: {0}")]
    UpstreamFetch(String),

    /// Origin answered with a payload that does not match the playlist shape
    #[error("Upstream parse error: {0}")]
    UpstreamParse(String),

    /// The resolved playlist has no tracks
    #[error("Empty playlist: {0}")]
    EmptyPlaylist(String),

    /// A selector was asked to pick from an empty track list
    #[error("No tracks available: {0}")]
    NoTracksAvailable(String),

    /// Client-held shuffle state could not be decoded
    #[error("State decode error: {0}")]
    StateDecode(String),

    /// Shuffle state could not be encoded for the client
    #[error("State encode error: {0}")]
    StateEncode(String),
}

impl PickError {
    /// Create a store error
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Create an upstream fetch error
    pub fn upstream_fetch(msg: impl Into<String>) -> Self {
        Self::UpstreamFetch(msg.into())
    }

    /// Create an upstream parse error
    pub fn upstream_parse(msg: impl Into<String>) -> Self {
        Self::UpstreamParse(msg.into())
    }

    /// Create an empty playlist error with the default message
    pub fn empty_playlist() -> Self {
        Self::EmptyPlaylist("Playlist contains no tracks".to_string())
    }

    /// Create a no tracks error with the default message
    pub fn no_tracks() -> Self {
        Self::NoTracksAvailable("No tracks available".to_string())
    }

    /// Create a state decode error
    pub fn state_decode(msg: impl Into<String>) -> Self {
        Self::StateDecode(msg.into())
    }

    /// Create a state encode error
    pub fn state_encode(msg: impl Into<String>) -> Self {
        Self::StateEncode(msg.into())
    }

    /// Wire tag identifying the failure kind in error bodies and logs
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Store(_) => "StoreError",
            Self::UpstreamFetch(_) => "UpstreamFetchError",
            Self::UpstreamParse(_) => "UpstreamParseError",
            Self::EmptyPlaylist(_) => "EmptyPlaylist",
            Self::NoTracksAvailable(_) => "NoTracksAvailable",
            Self::StateDecode(_) => "StateDecodeError",
            Self::StateEncode(_) => "StateEncodeError",
        }
    }

    /// Human-readable message without the kind prefix
    pub fn message(&self) -> &str {
        match self {
            Self::Store(msg)
            | Self::UpstreamFetch(msg)
            | Self::UpstreamParse(msg)
            | Self::EmptyPlaylist(msg)
            | Self::NoTracksAvailable(msg)
            | Self::StateDecode(msg)
            | Self::StateEncode(msg) => msg,
        }
    }

    /// Whether the origin fetch that produced this error may be attempted again.
    ///
    /// Only transient transport failures qualify; malformed payloads never do.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::UpstreamFetch(_))
    }
}
