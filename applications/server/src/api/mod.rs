/// API route modules
pub mod health;
pub mod track;

use crate::{config::CorsSettings, error::Result, state::AppState};
use axum::{http::Method, routing::get, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Build the HTTP router
///
/// Fails when the configured CORS origin is unusable, rather than opening
/// the API to every origin.
pub fn create_router(app_state: AppState) -> Result<Router> {
    let cors = cors_layer(&app_state.config.cors)?;

    Ok(Router::new()
        .route("/", get(track::random_track))
        .route("/health", get(health::health))
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
        .layer(cors)
        .with_state(app_state))
}

fn cors_layer(settings: &CorsSettings) -> Result<CorsLayer> {
    Ok(match settings.origin_header()? {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET])
            .allow_credentials(true),
        None => CorsLayer::permissive(),
    })
}
