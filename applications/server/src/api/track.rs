/// Track API route
use crate::{config::SelectionMode, error::Result, state::AppState};
use axum::{extract::State, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use needledrop_core::{format_artists, Track};
use needledrop_playback::{next_track, pick_avoiding_last, pick_uniform, QueueStatus};
use serde::Serialize;
use tracing::{debug, info};

#[derive(Debug, Serialize)]
pub struct TrackResponse {
    #[serde(flatten)]
    pub track: Track,

    /// Position in the shuffle queue, e.g. "3/12"; absent for random picks
    #[serde(rename = "queueStatus", skip_serializing_if = "Option::is_none")]
    pub queue_status: Option<String>,
}

impl TrackResponse {
    fn new(track: Track, status: Option<QueueStatus>) -> Self {
        Self {
            track: format_artists(track),
            queue_status: status.map(|s| s.to_string()),
        }
    }
}

/// GET / - Serve one track from the playlist
pub async fn random_track(
    State(app_state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<TrackResponse>)> {
    let config = &app_state.config;
    let playlist = app_state
        .playlist_cache
        .get_playlist(&config.origin.service_url)
        .await?;

    info!("Got {} tracks", playlist.tracks.len());

    match config.selection.mode {
        SelectionMode::Shuffle => shuffle_pick(&app_state, jar, &playlist.tracks),
        SelectionMode::Random => {
            let track = if config.selection.avoid_repeats {
                pick_avoiding_last(
                    app_state.store.as_ref(),
                    &config.cache.last_picked_key,
                    &playlist.tracks,
                )
                .await?
            } else {
                pick_uniform(&playlist.tracks)?.clone()
            };

            Ok((jar, Json(TrackResponse::new(track, None))))
        }
    }
}

fn shuffle_pick(
    app_state: &AppState,
    jar: CookieJar,
    tracks: &[Track],
) -> Result<(CookieJar, Json<TrackResponse>)> {
    let settings = &app_state.config.cookie;
    let token = jar.get(&settings.name).map(|c| c.value().to_string());

    let pick = next_track(tracks, token.as_deref())?;

    let jar = match pick.token {
        Some(token) => {
            let max_age = i64::try_from(settings.max_age_secs).unwrap_or(i64::MAX);
            jar.add(
                Cookie::build((settings.name.clone(), token))
                    .path("/")
                    .http_only(true)
                    .secure(true)
                    .same_site(SameSite::Lax)
                    .max_age(time::Duration::seconds(max_age)),
            )
        }
        None => {
            debug!(cookie = %settings.name, "Clearing shuffle queue cookie");
            jar.remove(Cookie::build((settings.name.clone(), "")).path("/"))
        }
    };

    Ok((jar, Json(TrackResponse::new(pick.track, pick.status))))
}
