use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    extract::State,
    http::{Request, StatusCode},
    routing::post,
    Form, Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use trainlog_rs::config::{Config, StravaConfig};
use trainlog_rs::routes;
use trainlog_rs::state::AppState;
use trainlog_rs::store::SqliteStore;
use trainlog_rs::types::units::MeasurementSystem;
use trainlog_rs::upload::strava::StravaUploader;

const GPX: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test"><trk><trkseg>
  <trkpt lat="52.5200" lon="13.4050"><time>2024-05-01T05:30:00Z</time></trkpt>
</trkseg></trk></gpx>"#;

#[derive(Clone, Default)]
struct MockStrava {
    logins: Arc<AtomicUsize>,
    uploads: Arc<AtomicUsize>,
}

async fn login(
    State(mock): State<MockStrava>,
    Form(form): Form<HashMap<String, String>>,
) -> Json<Value> {
    mock.logins.fetch_add(1, Ordering::SeqCst);
    if form.get("password").map(String::as_str) == Some("secret") {
        Json(json!({ "token": "fresh-token" }))
    } else {
        Json(json!({ "error": "Invalid email or password" }))
    }
}

async fn upload(
    State(mock): State<MockStrava>,
    Form(form): Form<HashMap<String, String>>,
) -> Json<Value> {
    mock.uploads.fetch_add(1, Ordering::SeqCst);
    let valid = form.get("type").map(String::as_str) == Some("gpx")
        && form.get("data").is_some_and(|data| data.contains("<gpx"))
        && form.get("token").is_some_and(|token| !token.is_empty());
    if valid {
        Json(json!({ "upload_id": 42 }))
    } else {
        Json(json!({ "error": "bad upload" }))
    }
}

async fn spawn_mock(mock: MockStrava) -> String {
    let app = Router::new()
        .route("/login", post(login))
        .route("/upload", post(upload))
        .with_state(mock);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("http://{addr}")
}

fn strava_config(base: &str, password: &str) -> StravaConfig {
    StravaConfig {
        email: "runner@example.com".to_string(),
        password: password.to_string(),
        login_url: format!("{base}/login"),
        upload_url: format!("{base}/upload"),
    }
}

fn write_gpx(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("1.gpx");
    std::fs::write(&path, GPX).expect("gpx");
    path
}

#[tokio::test]
async fn cached_token_skips_login() {
    let mock = MockStrava::default();
    let base = spawn_mock(mock.clone()).await;
    let dir = tempfile::tempdir().expect("tempdir");
    let token_path = dir.path().join(".strava_token");
    std::fs::write(&token_path, "cached-token\n").expect("token");

    let uploader = StravaUploader::new(&strava_config(&base, "wrong"), token_path);
    let status = uploader.run(1, &write_gpx(dir.path())).await;

    assert_eq!(status, "Strava Upload success (id: 42)!");
    assert_eq!(mock.logins.load(Ordering::SeqCst), 0);
    assert_eq!(mock.uploads.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn login_token_is_cached_after_login() {
    let mock = MockStrava::default();
    let base = spawn_mock(mock.clone()).await;
    let dir = tempfile::tempdir().expect("tempdir");
    let token_path = dir.path().join(".strava_token");

    let uploader = StravaUploader::new(&strava_config(&base, "secret"), token_path.clone());
    let token = uploader.login_token().await.expect("token");

    assert_eq!(token, "fresh-token");
    assert_eq!(std::fs::read_to_string(&token_path).expect("cached"), "fresh-token");

    let again = uploader.login_token().await.expect("token");
    assert_eq!(again, "fresh-token");
    assert_eq!(mock.logins.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn rejected_login_reports_json_error() {
    let mock = MockStrava::default();
    let base = spawn_mock(mock.clone()).await;
    let dir = tempfile::tempdir().expect("tempdir");

    let uploader =
        StravaUploader::new(&strava_config(&base, "wrong"), dir.path().join(".strava_token"));
    let status = uploader.run(1, &write_gpx(dir.path())).await;

    assert!(status.starts_with("Strava Upload JSON error:"), "{status}");
    assert!(status.ends_with("Username and password correct?"), "{status}");
    assert_eq!(mock.uploads.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn missing_track_log_fails_to_upload() {
    let mock = MockStrava::default();
    let base = spawn_mock(mock.clone()).await;
    let dir = tempfile::tempdir().expect("tempdir");

    let uploader =
        StravaUploader::new(&strava_config(&base, "secret"), dir.path().join(".strava_token"));
    let status = uploader.run(1, &dir.path().join("missing.gpx")).await;

    assert_eq!(status, "Strava Upload failed to upload!");
    assert_eq!(mock.uploads.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unreachable_service_reports_failure() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = strava_config("http://127.0.0.1:9", "secret");

    let uploader = StravaUploader::new(&config, dir.path().join(".strava_token"));
    let status = uploader.run(1, &write_gpx(dir.path())).await;

    assert!(status.starts_with("Strava Upload failed! "), "{status}");
}

#[tokio::test]
async fn upload_route_reports_status() {
    let mock = MockStrava::default();
    let base = spawn_mock(mock.clone()).await;
    let dir = tempfile::tempdir().expect("tempdir");
    let gpx_dir = dir.path().join("gpx");
    std::fs::create_dir_all(&gpx_dir).expect("gpx dir");
    write_gpx(&gpx_dir);

    let config = Config {
        port: 0,
        cache_ttl: Duration::from_secs(60),
        database_path: dir.path().join("trainlog.db"),
        conf_dir: dir.path().to_path_buf(),
        measurement_system: MeasurementSystem::Metric,
        max_hr: None,
        rest_hr: None,
        age: None,
        karvonen: false,
        catalog_path: None,
        strava: strava_config(&base, "secret"),
    };
    let state = AppState::with_store(config, SqliteStore::open_in_memory().expect("store"));
    let router = Router::new().merge(routes::strava::router()).with_state(state);

    let response = router
        .oneshot(
            Request::builder()
                .uri("/api/activities/1/strava")
                .method("POST")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json: Value = serde_json::from_slice(&body).expect("json");
    assert_eq!(json["status"], "Strava Upload success (id: 42)!");
    assert!(dir.path().join(".strava_token").exists());
}
