mod support;

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use songsync_engine::{
    AuthSession, CatalogClient, CatalogSettings, FailureKind, UserProfile, YouTubeCatalog,
};
use support::init_logging;
use wiremock::matchers::{
    body_partial_json, header, method, path, query_param, query_param_is_missing,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn catalog(server: &MockServer, auth: AuthSession) -> YouTubeCatalog {
    let settings = CatalogSettings {
        api_base: format!("{}/youtube/v3", server.uri()),
        request_timeout: Duration::from_secs(2),
        ..CatalogSettings::default()
    };
    YouTubeCatalog::new(settings, Arc::new(auth)).expect("client builds")
}

fn signed_in() -> AuthSession {
    AuthSession::signed_in("test-token", UserProfile::default())
}

#[tokio::test]
async fn search_returns_first_video_hit() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/youtube/v3/search"))
        .and(header("authorization", "Bearer test-token"))
        .and(query_param("q", "Artist - Title audio"))
        .and(query_param("type", "video"))
        .and(query_param("maxResults", "1"))
        .and(query_param("videoCategoryId", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{
                "id": { "kind": "youtube#video", "videoId": "abc123" },
                "snippet": {
                    "title": "Artist - Title (Official Audio)",
                    "channelTitle": "Artist",
                    "thumbnails": { "default": { "url": "https://i.ytimg.com/abc123.jpg" } }
                }
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let hit = catalog(&server, signed_in())
        .search("Artist - Title audio")
        .await
        .unwrap()
        .expect("one hit");

    assert_eq!(hit.id, "abc123");
    assert_eq!(hit.title, "Artist - Title (Official Audio)");
    assert_eq!(hit.channel_title.as_deref(), Some("Artist"));
    assert_eq!(
        hit.thumbnail_url.as_deref(),
        Some("https://i.ytimg.com/abc123.jpg")
    );
}

#[tokio::test]
async fn search_without_items_is_no_match() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/youtube/v3/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .mount(&server)
        .await;

    let hit = catalog(&server, signed_in()).search("Nobody").await.unwrap();
    assert_eq!(hit, None);
}

#[tokio::test]
async fn search_skips_items_without_video_id() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/youtube/v3/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{
                "id": { "kind": "youtube#channel", "channelId": "UC123" },
                "snippet": { "title": "A channel" }
            }]
        })))
        .mount(&server)
        .await;

    let hit = catalog(&server, signed_in()).search("Artist").await.unwrap();
    assert_eq!(hit, None);
}

#[tokio::test]
async fn append_posts_video_into_playlist() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/youtube/v3/playlistItems"))
        .and(query_param("part", "snippet"))
        .and(header("authorization", "Bearer test-token"))
        .and(body_partial_json(json!({
            "snippet": {
                "playlistId": "PL-target",
                "resourceId": { "kind": "youtube#video", "videoId": "abc123" }
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "item-1" })))
        .expect(1)
        .mount(&server)
        .await;

    catalog(&server, signed_in())
        .append_to_collection("PL-target", "abc123")
        .await
        .unwrap();
}

#[tokio::test]
async fn append_surfaces_structured_service_message() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/youtube/v3/playlistItems"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": {
                "code": 403,
                "message": "quota exceeded",
                "errors": [{ "reason": "quotaExceeded" }]
            }
        })))
        .mount(&server)
        .await;

    let err = catalog(&server, signed_in())
        .append_to_collection("PL-target", "abc123")
        .await
        .unwrap_err();

    assert_eq!(err.kind, FailureKind::Service { status: 403 });
    assert_eq!(err.failure_reason(), "quota exceeded");
}

#[tokio::test]
async fn unstructured_failure_keeps_http_status() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/youtube/v3/playlistItems"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = catalog(&server, signed_in())
        .append_to_collection("PL-target", "abc123")
        .await
        .unwrap_err();

    assert_eq!(err.kind, FailureKind::HttpStatus(500));
    assert!(!err.is_service_error());
    assert_eq!(err.failure_reason(), "http status 500");
}

#[tokio::test]
async fn list_collections_follows_page_tokens() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/youtube/v3/playlists"))
        .and(query_param("mine", "true"))
        .and(query_param_is_missing("pageToken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "nextPageToken": "page-2",
            "items": [{
                "id": "PL-1",
                "snippet": { "title": "osu! favourites" },
                "contentDetails": { "itemCount": 12 }
            }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/youtube/v3/playlists"))
        .and(query_param("pageToken", "page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{
                "id": "PL-2",
                "snippet": { "title": "Workout" }
            }]
        })))
        .mount(&server)
        .await;

    let collections = catalog(&server, signed_in()).list_collections().await.unwrap();

    let summary: Vec<(&str, &str, Option<u64>)> = collections
        .iter()
        .map(|c| (c.id.as_str(), c.title.as_str(), c.item_count))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("PL-1", "osu! favourites", Some(12)),
            ("PL-2", "Workout", None),
        ]
    );
}

fn playlist_page(id: &str, next: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "nextPageToken": next,
        "items": [{ "id": id, "snippet": { "title": id } }]
    }))
}

#[tokio::test]
async fn list_collections_stops_on_page_token_cycle() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/youtube/v3/playlists"))
        .and(query_param_is_missing("pageToken"))
        .respond_with(playlist_page("PL-1", "A"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/youtube/v3/playlists"))
        .and(query_param("pageToken", "A"))
        .respond_with(playlist_page("PL-2", "B"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/youtube/v3/playlists"))
        .and(query_param("pageToken", "B"))
        .respond_with(playlist_page("PL-3", "A"))
        .expect(1)
        .mount(&server)
        .await;

    let collections = catalog(&server, signed_in()).list_collections().await.unwrap();

    let ids: Vec<&str> = collections.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["PL-1", "PL-2", "PL-3"]);
}

#[tokio::test]
async fn create_collection_returns_new_playlist() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/youtube/v3/playlists"))
        .and(query_param("part", "snippet,status"))
        .and(body_partial_json(json!({
            "snippet": { "title": "osu! import" },
            "status": { "privacyStatus": "private" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "PL-new",
            "snippet": { "title": "osu! import" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let created = catalog(&server, signed_in())
        .create_collection("osu! import")
        .await
        .unwrap();

    assert_eq!(created.id, "PL-new");
    assert_eq!(created.title, "osu! import");
    assert_eq!(created.item_count, Some(0));
}

#[tokio::test]
async fn signed_out_client_makes_no_requests() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = catalog(&server, AuthSession::new());
    assert!(!client.is_authenticated());

    let err = client.search("Artist").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::NotAuthenticated);
}

#[tokio::test]
async fn expired_token_maps_to_not_authenticated() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/youtube/v3/playlists"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = catalog(&server, signed_in())
        .list_collections()
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::NotAuthenticated);
}

#[tokio::test]
async fn sign_out_takes_effect_on_next_call() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/youtube/v3/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let auth = Arc::new(signed_in());
    let settings = CatalogSettings {
        api_base: format!("{}/youtube/v3", server.uri()),
        ..CatalogSettings::default()
    };
    let client = YouTubeCatalog::new(settings, auth.clone()).unwrap();

    client.search("first").await.unwrap();
    auth.sign_out();
    let err = client.search("second").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::NotAuthenticated);
}
