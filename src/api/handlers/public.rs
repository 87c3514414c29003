use crate::api::error::AppError;
use crate::models::ScanResult;
use crate::services::log_service::LogService;
use crate::services::qr_code_service::QrCodeService;
use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
};
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlayLogRequest {
    pub watched_duration_secs: Option<f64>,
    #[serde(default)]
    pub completed: bool,
}

/// `IP={ip}; UA={user_agent}` provenance string for event logs.
fn client_info(headers: &HeaderMap) -> String {
    let ip = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("unknown");
    let user_agent = headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    format!("IP={ip}; UA={user_agent}")
}

#[utoipa::path(
    get,
    path = "/api/public/resolve/{codeValue}",
    params(("codeValue" = String, Path, description = "Scanned code value or full play URL")),
    responses(
        (status = 200, description = "Playable video for the code", body = ScanResult),
        (status = 404, description = "Unknown, inactive, or unplayable code")
    ),
    tag = "public"
)]
pub async fn resolve(
    State(state): State<crate::AppState>,
    Path(code_value): Path<String>,
    headers: HeaderMap,
) -> Result<Json<ScanResult>, AppError> {
    let client_info = client_info(&headers);

    let result = QrCodeService::resolve(&state.db, state.storage.as_ref(), &code_value)
        .await?
        .ok_or(AppError::NotFound("QR code not found".to_string()))?;

    LogService::record_scan(
        &state.db,
        &result.qr_code.id,
        true,
        None,
        Some(client_info),
    )
    .await?;

    Ok(Json(result))
}

#[utoipa::path(
    post,
    path = "/api/public/videos/{videoId}/plays",
    params(("videoId" = String, Path, description = "Video id")),
    request_body = PlayLogRequest,
    responses(
        (status = 202, description = "Play event accepted")
    ),
    tag = "public"
)]
pub async fn record_play(
    State(state): State<crate::AppState>,
    Path(video_id): Path<String>,
    headers: HeaderMap,
    Json(req): Json<PlayLogRequest>,
) -> Result<StatusCode, AppError> {
    let client_info = client_info(&headers);

    LogService::record_play(
        &state.db,
        &video_id,
        req.watched_duration_secs,
        req.completed,
        Some(client_info),
    )
    .await?;

    Ok(StatusCode::ACCEPTED)
}
