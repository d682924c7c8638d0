//! Tests for the origin client against a mock playlist endpoint.

use needledrop_core::{PickError, PlaylistOrigin};
use needledrop_origin::{OriginClient, OriginError, OriginSettings};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn playlist_body() -> serde_json::Value {
    json!({
        "meta": { "embedCount": 2, "richInfoCount": 2 },
        "tracks": [
            {
                "uri": "spotify:track:1",
                "title": "First",
                "artist": "A",
                "duration": 180000,
                "isExplicit": false,
                "previewUrl": "https://p.example.com/1.mp3",
                "coverUrl": "https://img.example.com/1.jpg",
                "artists": ["A"]
            },
            {
                "uri": "spotify:track:2",
                "title": "Second",
                "artist": "B",
                "duration": 200000,
                "isExplicit": true,
                "previewUrl": null,
                "coverUrl": "https://img.example.com/2.jpg",
                "artists": ["B", "C"]
            }
        ]
    })
}

fn client() -> OriginClient {
    OriginClient::new(OriginSettings::default()).unwrap()
}

#[tokio::test]
async fn test_fetch_playlist() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(playlist_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let playlist = client().fetch(&mock_server.uri()).await.unwrap();

    assert_eq!(playlist.tracks.len(), 2);
    assert_eq!(playlist.meta.embed_count, 2);
    assert_eq!(playlist.tracks[1].artists, vec!["B", "C"]);
    assert!(playlist.tracks[1].is_explicit);
}

#[tokio::test]
async fn test_sends_configured_user_agent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(header("user-agent", "needledrop-test/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(playlist_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = OriginClient::new(OriginSettings::new("needledrop-test/1.0")).unwrap();
    assert!(client.fetch(&mock_server.uri()).await.is_ok());
}

#[tokio::test]
async fn test_extra_fields_are_ignored() {
    let mock_server = MockServer::start().await;

    let mut body = playlist_body();
    body["generatedAt"] = json!("2024-05-01T00:00:00Z");
    body["tracks"][0]["popularity"] = json!(87);

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&mock_server)
        .await;

    let playlist = client().fetch(&mock_server.uri()).await.unwrap();
    assert_eq!(playlist.tracks.len(), 2);
}

#[tokio::test]
async fn test_missing_field_is_parse_error() {
    let mock_server = MockServer::start().await;

    let mut body = playlist_body();
    body["tracks"][0].as_object_mut().unwrap().remove("coverUrl");

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&mock_server)
        .await;

    match client().fetch(&mock_server.uri()).await.unwrap_err() {
        OriginError::Parse(msg) => assert!(msg.contains("coverUrl")),
        e => panic!("Expected Parse error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_invalid_json_is_upstream_parse() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let err = client().fetch_playlist(&mock_server.uri()).await.unwrap_err();
    assert!(matches!(err, PickError::UpstreamParse(_)));
}

#[tokio::test]
async fn test_server_error_is_upstream_fetch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&mock_server)
        .await;

    match client().fetch(&mock_server.uri()).await.unwrap_err() {
        OriginError::Status { status, message } => {
            assert_eq!(status, 502);
            assert!(message.contains("Bad Gateway"));
        }
        e => panic!("Expected Status error, got: {:?}", e),
    }

    let err = client().fetch_playlist(&mock_server.uri()).await.unwrap_err();
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_unreachable_origin_is_upstream_fetch() {
    // Port 9 (discard) is closed on test hosts
    let err = client()
        .fetch_playlist("http://127.0.0.1:9/")
        .await
        .unwrap_err();

    assert!(matches!(err, PickError::UpstreamFetch(_)));
}

#[tokio::test]
async fn test_invalid_endpoint_rejected_before_request() {
    match client().fetch("ftp://example.com").await.unwrap_err() {
        OriginError::InvalidUrl(_) => {}
        e => panic!("Expected InvalidUrl error, got: {:?}", e),
    }
}
