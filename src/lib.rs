pub mod api;
pub mod config;
pub mod entities;
pub mod infrastructure;
pub mod models;
pub mod services;
pub mod utils;

use crate::config::AppConfig;
use crate::services::storage::StorageService;
use axum::{
    Router,
    http::HeaderValue,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::auth::login,
        api::handlers::health::health_check,
        api::handlers::videos::list_videos,
        api::handlers::videos::get_video,
        api::handlers::videos::create_video,
        api::handlers::videos::update_video,
        api::handlers::videos::delete_video,
        api::handlers::qr_codes::list_qr_codes,
        api::handlers::qr_codes::get_qr_code,
        api::handlers::qr_codes::create_qr_code,
        api::handlers::qr_codes::update_qr_code,
        api::handlers::qr_codes::delete_qr_code,
        api::handlers::qr_codes::download_qr_image,
        api::handlers::logs::list_scan_logs,
        api::handlers::logs::list_play_logs,
        api::handlers::stats::summary,
        api::handlers::public::resolve,
        api::handlers::public::record_play,
    ),
    components(
        schemas(
            api::handlers::auth::LoginRequest,
            api::handlers::auth::LoginResponse,
            api::handlers::health::HealthResponse,
            api::handlers::videos::UpdateVideoRequest,
            api::handlers::qr_codes::CreateQrCodeRequest,
            api::handlers::qr_codes::UpdateQrCodeRequest,
            api::handlers::public::PlayLogRequest,
            models::VideoDto,
            models::QrCodeDto,
            models::ScanLogDto,
            models::PlayLogDto,
            models::ScanResult,
            models::DashboardSummary,
            models::VideoPage,
            models::QrCodePage,
            models::ScanLogPage,
            models::PlayLogPage,
        )
    ),
    tags(
        (name = "auth", description = "Admin authentication"),
        (name = "videos", description = "Video management"),
        (name = "qrcodes", description = "QR code registry"),
        (name = "logs", description = "Scan and play event listings"),
        (name = "stats", description = "Dashboard statistics"),
        (name = "public", description = "Anonymous scan/play endpoints")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub storage: Arc<dyn StorageService>,
    pub config: AppConfig,
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers(Any);

    if allowed_origins.iter().any(|o| o == "*") {
        cors.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors.allow_origin(AllowOrigin::list(origins))
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(api::handlers::health::health_check))
        .route("/api/auth/login", post(api::handlers::auth::login))
        .route(
            "/api/public/resolve/:code_value",
            get(api::handlers::public::resolve),
        )
        .route(
            "/api/public/videos/:video_id/plays",
            post(api::handlers::public::record_play),
        )
        .route(
            "/api/qrcodes/:id/image",
            get(api::handlers::qr_codes::download_qr_image),
        )
        .route(
            "/api/videos",
            get(api::handlers::videos::list_videos)
                .post(api::handlers::videos::create_video)
                .layer(axum::extract::DefaultBodyLimit::max(
                    // Buffer for multipart overhead
                    state.config.max_upload_size + 10 * 1024 * 1024,
                ))
                .layer(from_fn_with_state(
                    state.clone(),
                    api::middleware::auth::auth_middleware,
                )),
        )
        .route(
            "/api/videos/:id",
            get(api::handlers::videos::get_video)
                .put(api::handlers::videos::update_video)
                .delete(api::handlers::videos::delete_video)
                .layer(from_fn_with_state(
                    state.clone(),
                    api::middleware::auth::auth_middleware,
                )),
        )
        .route(
            "/api/qrcodes",
            get(api::handlers::qr_codes::list_qr_codes)
                .post(api::handlers::qr_codes::create_qr_code)
                .layer(from_fn_with_state(
                    state.clone(),
                    api::middleware::auth::auth_middleware,
                )),
        )
        .route(
            "/api/qrcodes/:id",
            get(api::handlers::qr_codes::get_qr_code)
                .put(api::handlers::qr_codes::update_qr_code)
                .delete(api::handlers::qr_codes::delete_qr_code)
                .layer(from_fn_with_state(
                    state.clone(),
                    api::middleware::auth::auth_middleware,
                )),
        )
        .route(
            "/api/logs/scans",
            get(api::handlers::logs::list_scan_logs).layer(from_fn_with_state(
                state.clone(),
                api::middleware::auth::auth_middleware,
            )),
        )
        .route(
            "/api/logs/plays",
            get(api::handlers::logs::list_play_logs).layer(from_fn_with_state(
                state.clone(),
                api::middleware::auth::auth_middleware,
            )),
        )
        .route(
            "/api/stats/summary",
            get(api::handlers::stats::summary).layer(from_fn_with_state(
                state.clone(),
                api::middleware::auth::auth_middleware,
            )),
        )
        .nest_service(
            "/storage",
            ServeDir::new(state.config.storage_base_path.clone()),
        )
        .layer(cors_layer(&state.config.allowed_origins))
        .with_state(state)
}
