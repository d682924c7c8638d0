//! Response formatting helpers
//!
//! Both functions are total: they never fail.

use crate::error::PickError;
use crate::types::Track;
use serde::{Deserialize, Serialize};

/// Re-derive the `artist` display string from `artists`.
///
/// Up to two names are joined with `" & "`; longer lists are comma separated
/// with `" & "` before the last name.
pub fn format_artists(mut track: Track) -> Track {
    track.artist = match track.artists.split_last() {
        Some((last, rest)) if rest.len() >= 2 => format!("{} & {}", rest.join(", "), last),
        _ => track.artists.join(" & "),
    };
    track
}

/// JSON body returned for every surfaced failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Failure kind tag
    pub error: String,

    /// Human-readable detail
    pub message: String,
}

/// Build the error body for a failure kind and message
pub fn to_error_body(kind: impl Into<String>, message: impl Into<String>) -> ErrorBody {
    ErrorBody {
        error: kind.into(),
        message: message.into(),
    }
}

impl From<&PickError> for ErrorBody {
    fn from(err: &PickError) -> Self {
        to_error_body(err.tag(), err.message())
    }
}
