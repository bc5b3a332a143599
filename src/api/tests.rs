use super::*;
use crate::catalog::TimeOfDay;
use crate::config::ApiSettings;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api_for(server: &MockServer) -> HttpApi {
    let settings = ApiSettings {
        base_url: format!("{}/api/", server.uri()),
        ..ApiSettings::default()
    };
    HttpApi::new(&settings).unwrap()
}

fn track_json(id: &str) -> serde_json::Value {
    json!({
        "track_id": id,
        "name_track": format!("Song {id}"),
        "artist_name": "Artist",
        "audio_url": format!("http://audio.test/{id}.mp3"),
        "album_image": format!("http://img.test/{id}.jpg"),
    })
}

fn sample_track(id: &str) -> Track {
    serde_json::from_value(track_json(id)).unwrap()
}

#[test]
fn new_rejects_non_http_urls() {
    for bad in ["", "   ", "ftp://example.com"] {
        let settings = ApiSettings {
            base_url: bad.to_string(),
            ..ApiSettings::default()
        };
        assert!(matches!(
            HttpApi::new(&settings),
            Err(ApiError::InvalidUrl(_))
        ));
    }
}

#[test]
fn new_strips_trailing_slash() {
    let settings = ApiSettings {
        base_url: "http://localhost:8000/api/".to_string(),
        ..ApiSettings::default()
    };
    let api = HttpApi::new(&settings).unwrap();
    assert_eq!(api.base_url(), "http://localhost:8000/api");
}

#[tokio::test]
async fn tracks_by_mood_posts_mood_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/tracks/"))
        .and(body_json(json!({ "mood": "energy" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([track_json("1"), track_json("2")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let tracks = api_for(&server).tracks_by_mood(Mood::Energy).await.unwrap();
    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[0].track_id, "1");
    assert_eq!(tracks[1].name, "Song 2");
}

#[tokio::test]
async fn search_posts_query_and_accepts_empty_results() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/tracks/"))
        .and(body_json(json!({ "query": "nothing matches" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let tracks = api_for(&server).search("nothing matches").await.unwrap();
    assert!(tracks.is_empty());
}

#[tokio::test]
async fn time_of_day_collection_carries_the_period() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tracks/mood/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tracks": [track_json("7")],
            "time_of_day": "night",
        })))
        .mount(&server)
        .await;

    let r = api_for(&server).tracks_by_time_of_day().await.unwrap();
    assert_eq!(r.time_of_day, TimeOfDay::Night);
    assert_eq!(r.tracks[0].track_id, "7");
}

#[tokio::test]
async fn list_favorites_sends_user_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/favorites/"))
        .and(query_param("user_id", "demo_user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([track_json("3")])))
        .mount(&server)
        .await;

    let favs = api_for(&server).list_favorites("demo_user").await.unwrap();
    assert_eq!(favs.len(), 1);
}

#[tokio::test]
async fn add_favorite_sends_all_track_fields_and_maps_409_to_conflict() {
    let server = MockServer::start().await;
    let mut body = track_json("5");
    body["user_id"] = json!("demo_user");

    Mock::given(method("POST"))
        .and(path("/api/favorites/"))
        .and(body_json(body.clone()))
        .respond_with(ResponseTemplate::new(201).set_body_json(track_json("5")))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/favorites/"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({ "detail": "already favorite" })),
        )
        .mount(&server)
        .await;

    let api = api_for(&server);
    let stored = api.add_favorite("demo_user", &sample_track("5")).await.unwrap();
    assert_eq!(stored.track_id, "5");

    let err = api
        .add_favorite("demo_user", &sample_track("5"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Conflict));
}

#[tokio::test]
async fn remove_favorite_maps_404_and_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/favorites/delete/"))
        .and(body_json(json!({ "user_id": "demo_user", "track_id": "9" })))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/favorites/delete/"))
        .and(body_json(json!({ "user_id": "demo_user", "track_id": "10" })))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let api = api_for(&server);
    assert!(matches!(
        api.remove_favorite("demo_user", "9").await,
        Err(ApiError::NotFound)
    ));
    match api.remove_favorite("demo_user", "10").await {
        Err(ApiError::Server { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "boom");
        }
        other => panic!("expected server error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_a_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/tracks/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = api_for(&server).search("x").await.unwrap_err();
    assert!(matches!(err, ApiError::Parse(_)));
}

#[tokio::test]
async fn download_client_outlives_the_api_request_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/audio/slow.mp3"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(vec![7u8; 64])
                .set_delay(std::time::Duration::from_millis(1500)),
        )
        .mount(&server)
        .await;
    let settings = ApiSettings {
        base_url: server.uri(),
        timeout_secs: 1,
        ..ApiSettings::default()
    };
    let url = format!("{}/audio/slow.mp3", server.uri());

    let unlimited = download_client(&settings, 0).unwrap();
    let body = unlimited.get(&url).send().await.unwrap().bytes().await.unwrap();
    assert_eq!(body.len(), 64);

    let limited = download_client(&settings, 1).unwrap();
    let err = limited.get(&url).send().await.unwrap_err();
    assert!(err.is_timeout());
}
