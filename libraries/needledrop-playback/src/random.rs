//! Uniform random track selection

use needledrop_core::{KeyValueStore, PickError, Result, Track};
use rand::rngs::OsRng;
use rand::Rng;
use tracing::{debug, warn};

/// Draw an index uniformly from `0..len` using the OS CSPRNG.
///
/// # Errors
/// Returns [`PickError::NoTracksAvailable`] when `len` is zero
pub fn random_index(len: usize) -> Result<usize> {
    if len == 0 {
        return Err(PickError::no_tracks());
    }
    Ok(OsRng.gen_range(0..len))
}

/// Pick one track uniformly at random.
///
/// # Errors
/// Returns [`PickError::NoTracksAvailable`] when `tracks` is empty
pub fn pick_uniform(tracks: &[Track]) -> Result<&Track> {
    let index = random_index(tracks.len())?;
    Ok(&tracks[index])
}

/// Pick a track uniformly while avoiding the one served last.
///
/// The previous pick is read from `marker_key`; it is excluded unless it is
/// the only track left. The new pick's `uri` is written back best-effort: a
/// store failure on either side is logged and never fails the pick.
///
/// # Errors
/// Returns [`PickError::NoTracksAvailable`] when `tracks` is empty
pub async fn pick_avoiding_last(
    store: &dyn KeyValueStore,
    marker_key: &str,
    tracks: &[Track],
) -> Result<Track> {
    if tracks.is_empty() {
        return Err(PickError::no_tracks());
    }

    let last_uri = match store.get_text(marker_key).await {
        Ok(uri) => uri,
        Err(e) => {
            warn!(error = %e, "Failed to read last picked marker");
            None
        }
    };

    let candidates: Vec<&Track> = match last_uri.as_deref() {
        Some(last) => tracks.iter().filter(|t| t.uri != last).collect(),
        None => tracks.iter().collect(),
    };
    let candidates = if candidates.is_empty() {
        tracks.iter().collect()
    } else {
        candidates
    };

    let track = candidates[random_index(candidates.len())?].clone();
    debug!(uri = %track.uri, excluded = ?last_uri, "Picked track");

    if let Err(e) = store.put(marker_key, &track.uri, None).await {
        warn!(error = %e, "Failed to store last picked marker");
    }

    Ok(track)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    fn create_test_track(id: usize) -> Track {
        Track {
            uri: format!("spotify:track:{id}"),
            title: format!("Track {id}"),
            artist: "Artist".to_string(),
            duration: 180.0,
            is_explicit: false,
            preview_url: None,
            cover_url: String::new(),
            artists: vec!["Artist".to_string()],
        }
    }

    #[derive(Default)]
    struct TestStore {
        values: Mutex<HashMap<String, String>>,
        fail_reads: bool,
        fail_writes: bool,
    }

    #[async_trait]
    impl KeyValueStore for TestStore {
        async fn get_text(&self, key: &str) -> Result<Option<String>> {
            if self.fail_reads {
                return Err(PickError::store("read refused"));
            }
            Ok(self.values.lock().unwrap().get(key).cloned())
        }

        async fn put(&self, key: &str, value: &str, _ttl: Option<Duration>) -> Result<()> {
            if self.fail_writes {
                return Err(PickError::store("write refused"));
            }
            self.values
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    #[test]
    fn pick_uniform_empty_fails() {
        let err = pick_uniform(&[]).unwrap_err();
        assert_eq!(err.tag(), "NoTracksAvailable");
    }

    #[test]
    fn pick_uniform_returns_member() {
        let tracks: Vec<Track> = (0..5).map(create_test_track).collect();
        for _ in 0..100 {
            let track = pick_uniform(&tracks).unwrap();
            assert!(tracks.contains(track));
        }
    }

    #[test]
    fn pick_uniform_is_roughly_uniform() {
        let tracks: Vec<Track> = (0..4).map(create_test_track).collect();
        let mut counts = [0usize; 4];
        let trials = 40_000;

        for _ in 0..trials {
            let track = pick_uniform(&tracks).unwrap();
            let index = tracks.iter().position(|t| t == track).unwrap();
            counts[index] += 1;
        }

        // Expected 10_000 each; 5% tolerance is over 5 standard deviations
        for count in counts {
            assert!((9_500..=10_500).contains(&count), "skewed counts: {counts:?}");
        }
    }

    #[tokio::test]
    async fn avoids_last_picked_track() {
        let store = TestStore::default();
        let tracks: Vec<Track> = (0..2).map(create_test_track).collect();

        let mut previous = pick_avoiding_last(&store, "last", &tracks).await.unwrap();
        for _ in 0..50 {
            let next = pick_avoiding_last(&store, "last", &tracks).await.unwrap();
            assert_ne!(next.uri, previous.uri);
            previous = next;
        }
    }

    #[tokio::test]
    async fn records_marker() {
        let store = TestStore::default();
        let tracks: Vec<Track> = (0..3).map(create_test_track).collect();

        let track = pick_avoiding_last(&store, "last", &tracks).await.unwrap();
        let marker = store.values.lock().unwrap().get("last").cloned();
        assert_eq!(marker, Some(track.uri));
    }

    #[tokio::test]
    async fn single_track_falls_back_to_full_list() {
        let store = TestStore::default();
        let tracks = vec![create_test_track(0)];

        for _ in 0..3 {
            let track = pick_avoiding_last(&store, "last", &tracks).await.unwrap();
            assert_eq!(track.uri, "spotify:track:0");
        }
    }

    #[tokio::test]
    async fn store_failures_do_not_fail_the_pick() {
        let store = TestStore {
            fail_reads: true,
            fail_writes: true,
            ..TestStore::default()
        };
        let tracks: Vec<Track> = (0..3).map(create_test_track).collect();

        let track = pick_avoiding_last(&store, "last", &tracks).await.unwrap();
        assert!(tracks.contains(&track));
    }

    #[tokio::test]
    async fn empty_tracks_fail_without_touching_store() {
        let store = TestStore {
            fail_reads: true,
            ..TestStore::default()
        };
        let err = pick_avoiding_last(&store, "last", &[]).await.unwrap_err();
        assert_eq!(err, PickError::no_tracks());
    }
}
