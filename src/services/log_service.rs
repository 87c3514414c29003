use crate::api::error::AppError;
use crate::entities::{prelude::*, *};
use crate::models::{PagedResult, PlayLogDto, ScanLogDto};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

pub struct LogService;

impl LogService {
    /// Append a scan event. Best-effort: a missing QR code id is skipped
    /// without surfacing an error, so bookkeeping never blocks a scan.
    pub async fn record_scan(
        db: &DatabaseConnection,
        qr_code_id: &str,
        success: bool,
        fail_reason: Option<String>,
        client_info: Option<String>,
    ) -> Result<(), AppError> {
        let exists = QrCodes::find_by_id(qr_code_id).one(db).await?.is_some();
        if !exists {
            tracing::warn!("Skip scan log because QR code {} not found", qr_code_id);
            return Ok(());
        }

        let log = scan_logs::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            qr_code_id: Set(qr_code_id.to_string()),
            client_info: Set(client_info),
            success: Set(success),
            fail_reason: Set(fail_reason),
            timestamp: Set(Utc::now()),
        };

        // The referent can vanish between the check and the insert; a foreign
        // key rejection collapses into the same skip outcome.
        if let Err(e) = log.insert(db).await {
            tracing::warn!("Skip scan log for QR code {}: {}", qr_code_id, e);
            return Ok(());
        }

        tracing::info!("Scan log recorded for QR code {} (success={})", qr_code_id, success);
        Ok(())
    }

    /// Append a play event with the same best-effort policy as `record_scan`.
    pub async fn record_play(
        db: &DatabaseConnection,
        video_id: &str,
        watched_duration_secs: Option<f64>,
        completed: bool,
        client_info: Option<String>,
    ) -> Result<(), AppError> {
        let exists = Videos::find_by_id(video_id).one(db).await?.is_some();
        if !exists {
            tracing::warn!("Skip play log because video {} not found", video_id);
            return Ok(());
        }

        let log = play_logs::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            video_id: Set(video_id.to_string()),
            client_info: Set(client_info),
            watched_duration_secs: Set(watched_duration_secs),
            completed: Set(completed),
            timestamp: Set(Utc::now()),
        };

        if let Err(e) = log.insert(db).await {
            tracing::warn!("Skip play log for video {}: {}", video_id, e);
            return Ok(());
        }

        tracing::info!("Play log recorded for video {} (completed={})", video_id, completed);
        Ok(())
    }

    pub async fn get_scan_logs(
        db: &DatabaseConnection,
        page: u64,
        page_size: u64,
        qr_code_id: Option<String>,
    ) -> Result<PagedResult<ScanLogDto>, AppError> {
        let mut query = ScanLogs::find();
        if let Some(qr_code_id) = qr_code_id {
            query = query.filter(scan_logs::Column::QrCodeId.eq(qr_code_id));
        }

        let total = query.clone().count(db).await?;
        let rows = query
            .find_also_related(QrCodes)
            .order_by_desc(scan_logs::Column::Timestamp)
            .order_by_desc(scan_logs::Column::Id)
            .offset(page.saturating_sub(1) * page_size)
            .limit(page_size)
            .all(db)
            .await?;

        let items = rows
            .into_iter()
            .map(|(log, qr)| ScanLogDto::from_entity(log, qr.as_ref()))
            .collect();

        Ok(PagedResult::new(items, page, page_size, total))
    }

    pub async fn get_play_logs(
        db: &DatabaseConnection,
        page: u64,
        page_size: u64,
        video_id: Option<String>,
    ) -> Result<PagedResult<PlayLogDto>, AppError> {
        let mut query = PlayLogs::find();
        if let Some(video_id) = video_id {
            query = query.filter(play_logs::Column::VideoId.eq(video_id));
        }

        let total = query.clone().count(db).await?;
        let rows = query
            .find_also_related(Videos)
            .order_by_desc(play_logs::Column::Timestamp)
            .order_by_desc(play_logs::Column::Id)
            .offset(page.saturating_sub(1) * page_size)
            .limit(page_size)
            .all(db)
            .await?;

        let items = rows
            .into_iter()
            .map(|(log, video)| PlayLogDto::from_entity(log, video.as_ref()))
            .collect();

        Ok(PagedResult::new(items, page, page_size, total))
    }
}
