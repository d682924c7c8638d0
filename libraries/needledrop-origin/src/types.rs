//! Settings for the origin client.

use std::time::Duration;

/// Transport settings for [`crate::OriginClient`].
#[derive(Debug, Clone)]
pub struct OriginSettings {
    /// `User-Agent` header sent with every request
    pub user_agent: String,
    /// Time allowed to establish a connection
    pub connect_timeout: Duration,
}

impl OriginSettings {
    /// Create settings with a custom user agent and the default connect timeout.
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            ..Self::default()
        }
    }
}

impl Default for OriginSettings {
    fn default() -> Self {
        Self {
            user_agent: format!("needledrop/{}", env!("CARGO_PKG_VERSION")),
            connect_timeout: Duration::from_secs(2),
        }
    }
}
