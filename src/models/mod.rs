use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::{play_logs, qr_codes, scan_logs, videos};
use crate::services::storage::StorageService;

/// One page of a filtered listing plus the total over the whole filter.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[aliases(
    VideoPage = PagedResult<VideoDto>,
    QrCodePage = PagedResult<QrCodeDto>,
    ScanLogPage = PagedResult<ScanLogDto>,
    PlayLogPage = PagedResult<PlayLogDto>
)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub page_size: u64,
    pub total_count: u64,
}

impl<T> PagedResult<T> {
    pub fn new(items: Vec<T>, page: u64, page_size: u64, total_count: u64) -> Self {
        Self {
            items,
            page,
            page_size,
            total_count,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VideoDto {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    /// Publicly reachable URL of the video file.
    pub file_path: String,
    pub cover_path: Option<String>,
    pub duration_secs: Option<f64>,
    pub content_type: Option<String>,
    pub file_size: Option<i64>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl VideoDto {
    pub fn from_entity(model: videos::Model, storage: &dyn StorageService) -> Self {
        let cover_path = model
            .cover_path
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .map(|p| storage.public_url(p));

        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            file_path: storage.public_url(&model.file_path),
            cover_path,
            duration_secs: model.duration_secs,
            content_type: model.content_type,
            file_size: model.file_size,
            is_active: model.is_active,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QrCodeDto {
    pub id: String,
    pub code_value: String,
    pub video_id: String,
    /// Read-time join; empty only if the video row vanished mid-read.
    pub video_title: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub description: Option<String>,
}

impl QrCodeDto {
    pub fn from_entity(model: qr_codes::Model, video: Option<&videos::Model>) -> Self {
        Self {
            id: model.id,
            code_value: model.code_value,
            video_id: model.video_id,
            video_title: video.map(|v| v.title.clone()).unwrap_or_default(),
            is_active: model.is_active,
            created_at: model.created_at,
            description: model.description,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScanLogDto {
    pub id: String,
    pub qr_code_id: String,
    pub code_value: String,
    pub timestamp: DateTime<Utc>,
    pub success: bool,
    pub fail_reason: Option<String>,
    pub client_info: Option<String>,
}

impl ScanLogDto {
    pub fn from_entity(model: scan_logs::Model, qr_code: Option<&qr_codes::Model>) -> Self {
        Self {
            id: model.id,
            qr_code_id: model.qr_code_id,
            code_value: qr_code.map(|q| q.code_value.clone()).unwrap_or_default(),
            timestamp: model.timestamp,
            success: model.success,
            fail_reason: model.fail_reason,
            client_info: model.client_info,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlayLogDto {
    pub id: String,
    pub video_id: String,
    pub video_title: String,
    pub timestamp: DateTime<Utc>,
    pub watched_duration_secs: Option<f64>,
    pub completed: bool,
    pub client_info: Option<String>,
}

impl PlayLogDto {
    pub fn from_entity(model: play_logs::Model, video: Option<&videos::Model>) -> Self {
        Self {
            id: model.id,
            video_id: model.video_id,
            video_title: video.map(|v| v.title.clone()).unwrap_or_default(),
            timestamp: model.timestamp,
            watched_duration_secs: model.watched_duration_secs,
            completed: model.completed,
            client_info: model.client_info,
        }
    }
}

/// Outcome of resolving a scanned code: the code and its playable video.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    pub qr_code: QrCodeDto,
    pub video: VideoDto,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub video_count: u64,
    pub qr_code_count: u64,
    pub scan_count: u64,
    pub play_count: u64,
}
