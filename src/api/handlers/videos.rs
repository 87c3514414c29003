use crate::api::error::AppError;
use crate::models::{PagedResult, VideoDto};
use crate::services::video_service::VideoService;
use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
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
pub struct ListVideosQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
    pub search: Option<String>,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVideoRequest {
    pub title: String,
    pub description: Option<String>,
    pub is_active: bool,
}

#[utoipa::path(
    get,
    path = "/api/videos",
    params(
        ("page" = Option<u64>, Query, description = "1-based page number"),
        ("pageSize" = Option<u64>, Query, description = "Items per page"),
        ("search" = Option<String>, Query, description = "Case-insensitive title substring")
    ),
    responses(
        (status = 200, description = "Paged videos", body = VideoPage),
        (status = 401, description = "Unauthorized")
    ),
    security(("jwt" = [])),
    tag = "videos"
)]
pub async fn list_videos(
    State(state): State<crate::AppState>,
    Query(query): Query<ListVideosQuery>,
) -> Result<Json<PagedResult<VideoDto>>, AppError> {
    let result = VideoService::get_paged(
        &state.db,
        state.storage.as_ref(),
        query.page,
        query.page_size,
        query.search,
    )
    .await?;
    Ok(Json(result))
}

#[utoipa::path(
    get,
    path = "/api/videos/{id}",
    params(("id" = String, Path, description = "Video id")),
    responses(
        (status = 200, description = "Video found", body = VideoDto),
        (status = 404, description = "Video not found")
    ),
    security(("jwt" = [])),
    tag = "videos"
)]
pub async fn get_video(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> Result<Json<VideoDto>, AppError> {
    let video = VideoService::get_by_id(&state.db, state.storage.as_ref(), &id)
        .await?
        .ok_or(AppError::NotFound("Video not found".to_string()))?;
    Ok(Json(video))
}

#[utoipa::path(
    post,
    path = "/api/videos",
    request_body(content = String, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Video created", body = VideoDto),
        (status = 400, description = "Missing title or file")
    ),
    security(("jwt" = [])),
    tag = "videos"
)]
pub async fn create_video(
    State(state): State<crate::AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<VideoDto>), AppError> {
    let mut title: Option<String> = None;
    let mut description: Option<String> = None;
    let mut file: Option<(String, Option<String>, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        match field.name() {
            Some("title") => {
                title = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?,
                );
            }
            Some("description") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                if !text.trim().is_empty() {
                    description = Some(text);
                }
            }
            Some("file") => {
                let file_name = field.file_name().unwrap_or("video").to_string();
                let content_type = field.content_type().map(|c| c.to_string());
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                file = Some((file_name, content_type, data.to_vec()));
            }
            _ => {}
        }
    }

    let title = title
        .filter(|t| !t.trim().is_empty())
        .ok_or(AppError::BadRequest("Title is required".to_string()))?;
    if title.chars().count() > 200 {
        return Err(AppError::BadRequest(
            "Title must be at most 200 characters".to_string(),
        ));
    }
    let (file_name, content_type, data) =
        file.ok_or(AppError::BadRequest("Video file is required".to_string()))?;

    let video = VideoService::create(
        &state.db,
        state.storage.as_ref(),
        title,
        description,
        &file_name,
        content_type,
        &data,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(video)))
}

#[utoipa::path(
    put,
    path = "/api/videos/{id}",
    params(("id" = String, Path, description = "Video id")),
    request_body = UpdateVideoRequest,
    responses(
        (status = 200, description = "Video updated", body = VideoDto),
        (status = 404, description = "Video not found")
    ),
    security(("jwt" = [])),
    tag = "videos"
)]
pub async fn update_video(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateVideoRequest>,
) -> Result<Json<VideoDto>, AppError> {
    if req.title.trim().is_empty() {
        return Err(AppError::BadRequest("Title is required".to_string()));
    }
    if req.title.chars().count() > 200 {
        return Err(AppError::BadRequest(
            "Title must be at most 200 characters".to_string(),
        ));
    }

    let video = VideoService::update(
        &state.db,
        state.storage.as_ref(),
        &id,
        req.title,
        req.description,
        req.is_active,
    )
    .await?;
    Ok(Json(video))
}

#[utoipa::path(
    delete,
    path = "/api/videos/{id}",
    params(("id" = String, Path, description = "Video id")),
    responses(
        (status = 204, description = "Video deleted"),
        (status = 404, description = "Video not found")
    ),
    security(("jwt" = [])),
    tag = "videos"
)]
pub async fn delete_video(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    VideoService::delete(&state.db, state.storage.as_ref(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
