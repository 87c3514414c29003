use crate::api::error::AppError;
use crate::models::{PagedResult, PlayLogDto, ScanLogDto};
use crate::services::log_service::LogService;
use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

fn default_page() -> u64 {
    1
}

fn default_page_size() -> u64 {
    50
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanLogsQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
    pub qr_code_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayLogsQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
    pub video_id: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/logs/scans",
    params(
        ("page" = Option<u64>, Query, description = "1-based page number"),
        ("pageSize" = Option<u64>, Query, description = "Items per page"),
        ("qrCodeId" = Option<String>, Query, description = "Narrow to one QR code")
    ),
    responses(
        (status = 200, description = "Paged scan logs", body = ScanLogPage),
        (status = 401, description = "Unauthorized")
    ),
    security(("jwt" = [])),
    tag = "logs"
)]
pub async fn list_scan_logs(
    State(state): State<crate::AppState>,
    Query(query): Query<ScanLogsQuery>,
) -> Result<Json<PagedResult<ScanLogDto>>, AppError> {
    let result =
        LogService::get_scan_logs(&state.db, query.page, query.page_size, query.qr_code_id).await?;
    Ok(Json(result))
}

#[utoipa::path(
    get,
    path = "/api/logs/plays",
    params(
        ("page" = Option<u64>, Query, description = "1-based page number"),
        ("pageSize" = Option<u64>, Query, description = "Items per page"),
        ("videoId" = Option<String>, Query, description = "Narrow to one video")
    ),
    responses(
        (status = 200, description = "Paged play logs", body = PlayLogPage),
        (status = 401, description = "Unauthorized")
    ),
    security(("jwt" = [])),
    tag = "logs"
)]
pub async fn list_play_logs(
    State(state): State<crate::AppState>,
    Query(query): Query<PlayLogsQuery>,
) -> Result<Json<PagedResult<PlayLogDto>>, AppError> {
    let result =
        LogService::get_play_logs(&state.db, query.page, query.page_size, query.video_id).await?;
    Ok(Json(result))
}
