use async_trait::async_trait;
use needledrop_core::{PickError, PlaylistOrigin, PlaylistSnapshot, Result};
use std::cmp::min;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

/// Exponential backoff schedule for origin fetches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry; doubles for each following retry
    pub initial_delay: Duration,
    /// Upper bound for any single delay
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_delay: Duration::from_millis(1000),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, initial_delay: Duration) -> Self {
        Self {
            max_retries,
            initial_delay,
            ..Self::default()
        }
    }

    /// Delay to wait after failed attempt `attempt` (0-based)
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 2_u32.saturating_pow(attempt);
        min(self.initial_delay.saturating_mul(factor), self.max_delay)
    }

    /// Whether `error` on attempt `attempt` (0-based) earns another attempt
    pub fn should_retry(&self, error: &PickError, attempt: u32) -> bool {
        attempt < self.max_retries && error.is_retryable()
    }
}

/// Retry decorator for playlist origins
pub struct RetryOrigin<O> {
    inner: O,
    policy: RetryPolicy,
}

impl<O: PlaylistOrigin> RetryOrigin<O> {
    pub fn new(inner: O, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

#[async_trait]
impl<O: PlaylistOrigin> PlaylistOrigin for RetryOrigin<O> {
    async fn fetch_playlist(&self, endpoint: &str) -> Result<PlaylistSnapshot> {
        let mut attempt = 0;

        loop {
            info!(attempt = attempt + 1, "Fetching fresh playlist");

            match self.inner.fetch_playlist(endpoint).await {
                Ok(playlist) => return Ok(playlist),
                Err(error) if self.policy.should_retry(&error, attempt) => {
                    let delay = self.policy.delay_for_attempt(attempt);
                    warn!(
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "Origin fetch failed, retrying"
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(error) => return Err(error),
            }
        }
    }
}
