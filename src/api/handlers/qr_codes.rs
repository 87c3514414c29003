use crate::api::error::AppError;
use crate::models::{PagedResult, QrCodeDto};
use crate::services::qr_code_service::QrCodeService;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::ToSchema;

fn default_page() -> u64 {
    1
}

fn default_page_size() -> u64 {
    20
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQrCodesQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
    pub video_id: Option<String>,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateQrCodeRequest {
    pub video_id: String,
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQrCodeRequest {
    /// Rebinds the code to another video when set to a different id.
    pub video_id: Option<String>,
    pub description: Option<String>,
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

#[utoipa::path(
    get,
    path = "/api/qrcodes",
    params(
        ("page" = Option<u64>, Query, description = "1-based page number"),
        ("pageSize" = Option<u64>, Query, description = "Items per page"),
        ("videoId" = Option<String>, Query, description = "Narrow to codes bound to this video")
    ),
    responses(
        (status = 200, description = "Paged QR codes", body = QrCodePage),
        (status = 401, description = "Unauthorized")
    ),
    security(("jwt" = [])),
    tag = "qrcodes"
)]
pub async fn list_qr_codes(
    State(state): State<crate::AppState>,
    Query(query): Query<ListQrCodesQuery>,
) -> Result<Json<PagedResult<QrCodeDto>>, AppError> {
    let result =
        QrCodeService::get_paged(&state.db, query.page, query.page_size, query.video_id).await?;
    Ok(Json(result))
}

#[utoipa::path(
    get,
    path = "/api/qrcodes/{id}",
    params(("id" = String, Path, description = "QR code id")),
    responses(
        (status = 200, description = "QR code found", body = QrCodeDto),
        (status = 404, description = "QR code not found")
    ),
    security(("jwt" = [])),
    tag = "qrcodes"
)]
pub async fn get_qr_code(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> Result<Json<QrCodeDto>, AppError> {
    let qr_code = QrCodeService::get_by_id(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound("QR code not found".to_string()))?;
    Ok(Json(qr_code))
}

#[utoipa::path(
    post,
    path = "/api/qrcodes",
    request_body = CreateQrCodeRequest,
    responses(
        (status = 201, description = "QR code created", body = QrCodeDto),
        (status = 404, description = "Video not found")
    ),
    security(("jwt" = [])),
    tag = "qrcodes"
)]
pub async fn create_qr_code(
    State(state): State<crate::AppState>,
    Json(req): Json<CreateQrCodeRequest>,
) -> Result<(StatusCode, Json<QrCodeDto>), AppError> {
    let qr_code =
        QrCodeService::create(&state.db, req.video_id, req.description, req.is_active).await?;
    Ok((StatusCode::CREATED, Json(qr_code)))
}

#[utoipa::path(
    put,
    path = "/api/qrcodes/{id}",
    params(("id" = String, Path, description = "QR code id")),
    request_body = UpdateQrCodeRequest,
    responses(
        (status = 200, description = "QR code updated", body = QrCodeDto),
        (status = 404, description = "QR code or target video not found")
    ),
    security(("jwt" = [])),
    tag = "qrcodes"
)]
pub async fn update_qr_code(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateQrCodeRequest>,
) -> Result<Json<QrCodeDto>, AppError> {
    let qr_code =
        QrCodeService::update(&state.db, &id, req.video_id, req.description, req.is_active).await?;
    Ok(Json(qr_code))
}

#[utoipa::path(
    delete,
    path = "/api/qrcodes/{id}",
    params(("id" = String, Path, description = "QR code id")),
    responses(
        (status = 204, description = "QR code deleted"),
        (status = 404, description = "QR code not found")
    ),
    security(("jwt" = [])),
    tag = "qrcodes"
)]
pub async fn delete_qr_code(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    QrCodeService::delete(&state.db, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/qrcodes/{id}/image",
    params(("id" = String, Path, description = "QR code id")),
    responses(
        (status = 200, description = "PNG image of the code", content_type = "image/png"),
        (status = 404, description = "QR code not found")
    ),
    tag = "qrcodes"
)]
pub async fn download_qr_image(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let bytes = QrCodeService::generate_image(&state.db, &state.config, &id).await?;

    Ok((
        [
            (header::CONTENT_TYPE, mime::IMAGE_PNG.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"qrcode-{id}.png\""),
            ),
        ],
        bytes,
    ))
}
