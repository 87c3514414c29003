use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use qr_video_backend::config::AppConfig;
use qr_video_backend::entities::prelude::*;
use qr_video_backend::infrastructure::{database, seed};
use qr_video_backend::services::log_service::LogService;
use qr_video_backend::services::qr_code_service::QrCodeService;
use qr_video_backend::services::video_service::VideoService;
use qr_video_backend::{AppState, create_app};
use sea_orm::{Database, DatabaseConnection, EntityTrait, PaginatorTrait};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    database::run_migrations(&db, "sqlite::memory:").await.unwrap();
    db
}

use async_trait::async_trait;
use qr_video_backend::services::storage::StorageService;
use std::collections::HashMap;
use std::sync::Mutex;

struct MockStorageService {
    files: Mutex<HashMap<String, Vec<u8>>>,
    counter: Mutex<u64>,
}

impl MockStorageService {
    fn new() -> Self {
        Self {
            files: Mutex::new(HashMap::new()),
            counter: Mutex::new(0),
        }
    }
}

#[async_trait]
impl StorageService for MockStorageService {
    async fn save(
        &self,
        data: &[u8],
        sub_directory: &str,
        original_name: &str,
    ) -> anyhow::Result<String> {
        let mut counter = self.counter.lock().unwrap();
        *counter += 1;
        let path = format!("{}/{}-{}", sub_directory, counter, original_name);
        self.files.lock().unwrap().insert(path.clone(), data.to_vec());
        Ok(path)
    }

    async fn delete(&self, relative_path: &str) -> anyhow::Result<()> {
        self.files.lock().unwrap().remove(relative_path);
        Ok(())
    }

    async fn read(&self, relative_path: &str) -> anyhow::Result<Vec<u8>> {
        self.files
            .lock()
            .unwrap()
            .get(relative_path)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("path not found"))
    }

    fn public_url(&self, relative_path: &str) -> String {
        format!("/storage/{}", relative_path)
    }
}

async fn setup_state() -> AppState {
    let db = setup_test_db().await;
    let config = AppConfig::default();
    seed::seed_admin_user(&db, &config).await.unwrap();

    AppState {
        db,
        storage: Arc::new(MockStorageService::new()),
        config,
    }
}

async fn create_test_video(state: &AppState, title: &str) -> String {
    let video = VideoService::create(
        &state.db,
        state.storage.as_ref(),
        title.to_string(),
        None,
        "clip.mp4",
        Some("video/mp4".to_string()),
        b"fake video bytes",
    )
    .await
    .unwrap();
    video.id
}

async fn login(app: &axum::Router) -> String {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    r#"{"username": "admin", "password": "admin123"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body).unwrap();
    json["token"].as_str().unwrap().to_string()
}

async fn body_json(response: axum::http::Response<axum::body::Body>) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_full_api_flow() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::new("qr_video_backend=debug,tower_http=debug"))
        .with(fmt::layer().with_test_writer())
        .try_init();

    let state = setup_state().await;
    let app = create_app(state.clone());

    // Admin routes reject anonymous callers
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/videos")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let token = login(&app).await;

    // Bad credentials are rejected
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header("Content-Type", "application/json")
                .body(Body::from(r#"{"username": "admin", "password": "wrong"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Upload a video via multipart
    let boundary = "test-boundary-7d21";
    let multipart_body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"title\"\r\n\r\nLaunch teaser\r\n\
         --{b}\r\nContent-Disposition: form-data; name=\"description\"\r\n\r\nSpring launch\r\n\
         --{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"teaser.mp4\"\r\n\
         Content-Type: video/mp4\r\n\r\nfake mp4 payload\r\n--{b}--\r\n",
        b = boundary
    );

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/videos")
                .header("Authorization", format!("Bearer {token}"))
                .header(
                    "Content-Type",
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(Body::from(multipart_body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let video = body_json(response).await;
    let video_id = video["id"].as_str().unwrap().to_string();
    assert_eq!(video["title"], "Launch teaser");
    assert_eq!(video["isActive"], true);

    // Mint a QR code for it
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/qrcodes")
                .header("Authorization", format!("Bearer {token}"))
                .header("Content-Type", "application/json")
                .body(Body::from(format!(r#"{{"videoId": "{video_id}"}}"#)))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let qr_code = body_json(response).await;
    let qr_code_id = qr_code["id"].as_str().unwrap().to_string();
    let code_value = qr_code["codeValue"].as_str().unwrap().to_string();
    assert_eq!(code_value.len(), 32);
    assert_eq!(qr_code["videoTitle"], "Launch teaser");

    // Anonymous resolve records a scan and returns the playable video
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/public/resolve/{code_value}"))
                .header("User-Agent", "integration-test")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let scan = body_json(response).await;
    assert_eq!(scan["video"]["id"], video_id.as_str());
    assert_eq!(scan["qrCode"]["id"], qr_code_id.as_str());

    // Unknown codes resolve to 404
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/public/resolve/not-a-real-code")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Report a play event
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/api/public/videos/{video_id}/plays"))
                .header("Content-Type", "application/json")
                .body(Body::from(
                    r#"{"watchedDurationSecs": 12.5, "completed": false}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    // Scan log listing shows exactly the successful resolve
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/logs/scans")
                .header("Authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let scans = body_json(response).await;
    assert_eq!(scans["totalCount"], 1);
    assert_eq!(scans["items"][0]["codeValue"], code_value.as_str());
    assert_eq!(scans["items"][0]["success"], true);

    // Dashboard summary sees everything created so far
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/stats/summary")
                .header("Authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let summary = body_json(response).await;
    assert_eq!(summary["videoCount"], 1);
    assert_eq!(summary["qrCodeCount"], 1);
    assert_eq!(summary["scanCount"], 1);
    assert_eq!(summary["playCount"], 1);

    // QR image download is anonymous and returns a PNG
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/qrcodes/{qr_code_id}/image"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("Content-Type").unwrap(),
        "image/png"
    );
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
}

#[tokio::test]
async fn test_resolve_accepts_bare_codes_and_play_urls() {
    let state = setup_state().await;
    let video_id = create_test_video(&state, "Tutorial").await;
    let qr_code = QrCodeService::create(&state.db, video_id.clone(), None, true)
        .await
        .unwrap();
    let code = qr_code.code_value;

    for input in [
        code.clone(),
        format!("https://example.com/play/{code}"),
        format!("HTTPS://EXAMPLE.COM/PLAY/{code}"),
        format!("https://example.com/play/{code}?src=poster"),
        format!("https://example.com/play/{code}#t=30"),
    ] {
        let result = QrCodeService::resolve(&state.db, state.storage.as_ref(), &input)
            .await
            .unwrap();
        let result = result.unwrap_or_else(|| panic!("input {input:?} did not resolve"));
        assert_eq!(result.video.id, video_id);
    }

    assert!(
        QrCodeService::resolve(&state.db, state.storage.as_ref(), "")
            .await
            .unwrap()
            .is_none()
    );
    assert!(
        QrCodeService::resolve(&state.db, state.storage.as_ref(), "https://example.com/play/")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_resolve_gates_inactive_code_and_video() {
    let state = setup_state().await;
    let video_id = create_test_video(&state, "Demo reel").await;
    let qr_code = QrCodeService::create(&state.db, video_id.clone(), None, true)
        .await
        .unwrap();
    let code = qr_code.code_value.clone();

    // Active code on an active video resolves
    assert!(
        QrCodeService::resolve(&state.db, state.storage.as_ref(), &code)
            .await
            .unwrap()
            .is_some()
    );

    // Deactivating the code hides it
    QrCodeService::update(&state.db, &qr_code.id, None, None, false)
        .await
        .unwrap();
    assert!(
        QrCodeService::resolve(&state.db, state.storage.as_ref(), &code)
            .await
            .unwrap()
            .is_none()
    );

    // Reactivate the code, deactivate the video instead
    QrCodeService::update(&state.db, &qr_code.id, None, None, true)
        .await
        .unwrap();
    VideoService::update(
        &state.db,
        state.storage.as_ref(),
        &video_id,
        "Demo reel".to_string(),
        None,
        false,
    )
    .await
    .unwrap();
    assert!(
        QrCodeService::resolve(&state.db, state.storage.as_ref(), &code)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_rebind_qr_code_to_another_video() {
    let state = setup_state().await;
    let first = create_test_video(&state, "First").await;
    let second = create_test_video(&state, "Second").await;

    let qr_code = QrCodeService::create(&state.db, first.clone(), None, true)
        .await
        .unwrap();
    let code = qr_code.code_value.clone();

    let updated = QrCodeService::update(&state.db, &qr_code.id, Some(second.clone()), None, true)
        .await
        .unwrap();
    assert_eq!(updated.video_id, second);
    // The code value survives the rebind
    assert_eq!(updated.code_value, code);

    let result = QrCodeService::resolve(&state.db, state.storage.as_ref(), &code)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(result.video.id, second);

    // Rebinding to a missing video is rejected
    let err = QrCodeService::update(
        &state.db,
        &qr_code.id,
        Some("no-such-video".to_string()),
        None,
        true,
    )
    .await;
    assert!(err.is_err());
}

#[tokio::test]
async fn test_event_logging_is_best_effort() {
    let state = setup_state().await;

    // Events against unknown ids are swallowed, not errors
    LogService::record_scan(&state.db, "missing-qr", true, None, None)
        .await
        .unwrap();
    LogService::record_play(&state.db, "missing-video", None, false, None)
        .await
        .unwrap();
    assert_eq!(ScanLogs::find().count(&state.db).await.unwrap(), 0);
    assert_eq!(PlayLogs::find().count(&state.db).await.unwrap(), 0);

    // Events against real ids are persisted
    let video_id = create_test_video(&state, "Logged").await;
    let qr_code = QrCodeService::create(&state.db, video_id.clone(), None, true)
        .await
        .unwrap();

    LogService::record_scan(
        &state.db,
        &qr_code.id,
        true,
        None,
        Some("IP=203.0.113.9; UA=test".to_string()),
    )
    .await
    .unwrap();
    LogService::record_play(&state.db, &video_id, Some(42.0), true, None)
        .await
        .unwrap();
    assert_eq!(ScanLogs::find().count(&state.db).await.unwrap(), 1);
    assert_eq!(PlayLogs::find().count(&state.db).await.unwrap(), 1);
}

#[tokio::test]
async fn test_deleting_video_cascades_to_codes_and_logs() {
    let state = setup_state().await;
    let video_id = create_test_video(&state, "Doomed").await;
    let qr_code = QrCodeService::create(&state.db, video_id.clone(), None, true)
        .await
        .unwrap();
    LogService::record_scan(&state.db, &qr_code.id, true, None, None)
        .await
        .unwrap();
    LogService::record_play(&state.db, &video_id, None, false, None)
        .await
        .unwrap();

    VideoService::delete(&state.db, state.storage.as_ref(), &video_id)
        .await
        .unwrap();

    assert_eq!(Videos::find().count(&state.db).await.unwrap(), 0);
    assert_eq!(QrCodes::find().count(&state.db).await.unwrap(), 0);
    assert_eq!(ScanLogs::find().count(&state.db).await.unwrap(), 0);
    assert_eq!(PlayLogs::find().count(&state.db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_qr_code_pagination_covers_every_row_once() {
    let state = setup_state().await;
    let video_id = create_test_video(&state, "Paged").await;

    for _ in 0..25 {
        QrCodeService::create(&state.db, video_id.clone(), None, true)
            .await
            .unwrap();
    }

    let mut seen = std::collections::HashSet::new();
    for page in 1..=3u64 {
        let result = QrCodeService::get_paged(&state.db, page, 10, None)
            .await
            .unwrap();
        assert_eq!(result.total_count, 25);
        assert_eq!(result.page, page);
        assert_eq!(result.items.len(), if page == 3 { 5 } else { 10 });
        for item in result.items {
            assert!(seen.insert(item.id), "page {page} repeated a row");
        }
    }
    assert_eq!(seen.len(), 25);

    // Past-the-end pages are empty but still report the total
    let result = QrCodeService::get_paged(&state.db, 4, 10, None)
        .await
        .unwrap();
    assert!(result.items.is_empty());
    assert_eq!(result.total_count, 25);
}

#[tokio::test]
async fn test_cors_respects_configured_origins() {
    let mut state = setup_state().await;
    state.config.allowed_origins = vec!["https://dashboard.example.com".to_string()];
    let app = create_app(state);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("Origin", "https://dashboard.example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        "https://dashboard.example.com"
    );

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("Origin", "https://evil.example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(
        response
            .headers()
            .get("access-control-allow-origin")
            .is_none()
    );

    // The default "*" config stays wide open
    let state = setup_state().await;
    let app = create_app(state);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("Origin", "https://anywhere.example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        "*"
    );
}

#[tokio::test]
async fn test_update_video_rejects_overlong_title() {
    let state = setup_state().await;
    let video_id = create_test_video(&state, "Short title").await;
    let app = create_app(state);
    let token = login(&app).await;

    let long_title = "x".repeat(201);
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/api/videos/{video_id}"))
                .header("Authorization", format!("Bearer {token}"))
                .header("Content-Type", "application/json")
                .body(Body::from(format!(
                    r#"{{"title": "{long_title}", "isActive": true}}"#
                )))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // A title at the bound is still accepted
    let bound_title = "y".repeat(200);
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/api/videos/{video_id}"))
                .header("Authorization", format!("Bearer {token}"))
                .header("Content-Type", "application/json")
                .body(Body::from(format!(
                    r#"{{"title": "{bound_title}", "isActive": true}}"#
                )))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_video_search_filters_by_title() {
    let state = setup_state().await;
    create_test_video(&state, "Keynote 2026").await;
    create_test_video(&state, "Factory tour").await;
    create_test_video(&state, "keynote recap").await;

    let result = VideoService::get_paged(
        &state.db,
        state.storage.as_ref(),
        1,
        20,
        Some("KEYNOTE".to_string()),
    )
    .await
    .unwrap();
    assert_eq!(result.total_count, 2);

    let result = VideoService::get_paged(&state.db, state.storage.as_ref(), 1, 20, None)
        .await
        .unwrap();
    assert_eq!(result.total_count, 3);
}
