//! Shuffle primitives
//!
//! Permutation generation and playlist fingerprinting used by the shuffle queue.

use needledrop_core::Track;
use rand::rngs::OsRng;
use rand::seq::SliceRandom;
use sha2::{Digest, Sha256};

/// Length in hex characters of a [`playlist_fingerprint`]
pub const FINGERPRINT_LEN: usize = 16;

/// Random permutation of `0..len`
///
/// Fisher-Yates over the identity sequence, driven by the OS CSPRNG so every
/// ordering is equally likely and not predictable from earlier output.
pub fn shuffled_indexes(len: usize) -> Vec<usize> {
    let mut indexes: Vec<usize> = (0..len).collect();
    indexes.shuffle(&mut OsRng);
    indexes
}

/// Short identity hash over the ordered `uri:title` pairs of `tracks`
///
/// Used for change detection only: any insertion, deletion or reordering
/// yields a different value. Truncated SHA-256, hex encoded.
pub fn playlist_fingerprint(tracks: &[Track]) -> String {
    let mut hasher = Sha256::new();
    for (i, track) in tracks.iter().enumerate() {
        if i > 0 {
            hasher.update(b"|");
        }
        hasher.update(track.uri.as_bytes());
        hasher.update(b":");
        hasher.update(track.title.as_bytes());
    }
    let digest = hasher.finalize();
    hex::encode(&digest[..FINGERPRINT_LEN / 2])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn create_test_track(id: &str, title: &str) -> Track {
        Track {
            uri: format!("spotify:track:{id}"),
            title: title.to_string(),
            artist: "Artist".to_string(),
            duration: 180.0,
            is_explicit: false,
            preview_url: None,
            cover_url: String::new(),
            artists: vec!["Artist".to_string()],
        }
    }

    #[test]
    fn shuffle_preserves_all_indexes() {
        let indexes = shuffled_indexes(10);
        let unique: HashSet<usize> = indexes.iter().copied().collect();
        assert_eq!(indexes.len(), 10);
        assert_eq!(unique, (0..10).collect());
    }

    #[test]
    fn shuffle_changes_order() {
        // Probability of identity for 20 elements is 1/20!
        let indexes = shuffled_indexes(20);
        assert_ne!(indexes, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn shuffle_empty_and_single() {
        assert!(shuffled_indexes(0).is_empty());
        assert_eq!(shuffled_indexes(1), vec![0]);
    }

    #[test]
    fn fingerprint_is_fixed_width_hex() {
        let tracks = vec![create_test_track("1", "One")];
        let hash = playlist_fingerprint(&tracks);
        assert_eq!(hash.len(), FINGERPRINT_LEN);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn fingerprint_is_stable() {
        let tracks = vec![create_test_track("1", "One"), create_test_track("2", "Two")];
        assert_eq!(playlist_fingerprint(&tracks), playlist_fingerprint(&tracks.clone()));
    }

    #[test]
    fn fingerprint_detects_reorder_insert_delete() {
        let a = create_test_track("1", "One");
        let b = create_test_track("2", "Two");
        let c = create_test_track("3", "Three");

        let base = playlist_fingerprint(&[a.clone(), b.clone()]);
        assert_ne!(base, playlist_fingerprint(&[b.clone(), a.clone()]));
        assert_ne!(base, playlist_fingerprint(&[a.clone(), b.clone(), c]));
        assert_ne!(base, playlist_fingerprint(&[a]));
    }

    #[test]
    fn fingerprint_detects_title_change() {
        let before = playlist_fingerprint(&[create_test_track("1", "One")]);
        let after = playlist_fingerprint(&[create_test_track("1", "One (Remastered)")]);
        assert_ne!(before, after);
    }

    #[test]
    fn fingerprint_ignores_display_fields() {
        let mut track = create_test_track("1", "One");
        let before = playlist_fingerprint(std::slice::from_ref(&track));
        track.cover_url = "https://img.example.com/new.jpg".to_string();
        track.artists.push("Guest".to_string());
        assert_eq!(before, playlist_fingerprint(&[track]));
    }
}
