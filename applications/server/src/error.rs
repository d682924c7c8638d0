/// Server error types
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use needledrop_core::{to_error_body, ErrorBody, PickError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Pick(#[from] PickError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let body: ErrorBody = match self {
            ServerError::Pick(ref e) => {
                tracing::error!(kind = e.tag(), "Request failed: {}", e.message());
                ErrorBody::from(e)
            }
            ServerError::Config(ref msg) => {
                tracing::error!("Config error: {}", msg);
                to_error_body("ConfigError", msg.clone())
            }
        };

        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(err: ServerError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_pick_error_maps_to_500_with_tag() {
        let (status, body) = body_of(PickError::empty_playlist().into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "EmptyPlaylist");
        assert_eq!(body["message"], "Playlist contains no tracks");
    }

    #[tokio::test]
    async fn test_config_error_body() {
        let (status, body) = body_of(ServerError::Config("missing url".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "ConfigError");
        assert_eq!(body["message"], "missing url");
    }
}
