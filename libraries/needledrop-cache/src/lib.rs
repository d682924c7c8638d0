//! needledrop playlist cache
//!
//! Resolves the current playlist snapshot, shielding the origin behind a
//! time-limited cache entry.
//!
//! # Resolution order
//!
//! 1. Read the cache entry. Read failures and undecodable values count as a miss.
//! 2. On a miss, fetch from the origin with a per-attempt timeout, retrying
//!    transport failures with exponential backoff.
//! 3. Write the fresh snapshot back with the configured TTL (best effort).
//! 4. Reject a snapshot with no tracks, whichever path produced it.
//!
//! The building blocks are origin decorators in the same shape as the
//! playlist origin itself: [`TimeoutOrigin`] bounds a single attempt and
//! [`RetryOrigin`] repeats attempts per [`RetryPolicy`].

mod manager;
mod retry;
mod timeout;

pub use manager::{CacheSettings, PlaylistCache};
pub use retry::{RetryOrigin, RetryPolicy};
pub use timeout::TimeoutOrigin;
