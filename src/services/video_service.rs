use crate::api::error::AppError;
use crate::entities::{prelude::*, *};
use crate::models::{PagedResult, VideoDto};
use crate::services::storage::StorageService;
use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

pub struct VideoService;

impl VideoService {
    /// Store the uploaded bytes and insert the video row.
    pub async fn create(
        db: &DatabaseConnection,
        storage: &dyn StorageService,
        title: String,
        description: Option<String>,
        file_name: &str,
        content_type: Option<String>,
        data: &[u8],
    ) -> Result<VideoDto, AppError> {
        let relative_path = storage.save(data, "videos", file_name).await?;

        let video = videos::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            title: Set(title.clone()),
            description: Set(description),
            file_path: Set(relative_path),
            cover_path: Set(None),
            duration_secs: Set(None),
            content_type: Set(content_type),
            file_size: Set(Some(data.len() as i64)),
            is_active: Set(true),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        };

        let video = video.insert(db).await?;
        tracing::info!("Video '{}' created with id {}", title, video.id);
        Ok(VideoDto::from_entity(video, storage))
    }

    pub async fn update(
        db: &DatabaseConnection,
        storage: &dyn StorageService,
        id: &str,
        title: String,
        description: Option<String>,
        is_active: bool,
    ) -> Result<VideoDto, AppError> {
        let video = Videos::find_by_id(id)
            .one(db)
            .await?
            .ok_or(AppError::NotFound("Video not found".to_string()))?;

        let mut model: videos::ActiveModel = video.into();
        model.title = Set(title);
        model.description = Set(description);
        model.is_active = Set(is_active);
        model.updated_at = Set(Some(Utc::now()));
        let updated = model.update(db).await?;

        tracing::info!("Video {} updated", id);
        Ok(VideoDto::from_entity(updated, storage))
    }

    /// Remove the stored file first (best-effort), then the row. The store
    /// cascades the delete to the video's QR codes, their scan logs, and its
    /// play logs.
    pub async fn delete(
        db: &DatabaseConnection,
        storage: &dyn StorageService,
        id: &str,
    ) -> Result<(), AppError> {
        let video = Videos::find_by_id(id)
            .one(db)
            .await?
            .ok_or(AppError::NotFound("Video not found".to_string()))?;

        if let Err(e) = storage.delete(&video.file_path).await {
            tracing::warn!("Failed to delete file for video {}: {}", id, e);
        }
        if let Some(cover_path) = video.cover_path.as_deref().filter(|p| !p.trim().is_empty())
            && let Err(e) = storage.delete(cover_path).await
        {
            tracing::warn!("Failed to delete cover for video {}: {}", id, e);
        }

        let model: videos::ActiveModel = video.into();
        model.delete(db).await?;
        tracing::info!("Video {} deleted", id);
        Ok(())
    }

    pub async fn get_by_id(
        db: &DatabaseConnection,
        storage: &dyn StorageService,
        id: &str,
    ) -> Result<Option<VideoDto>, AppError> {
        let video = Videos::find_by_id(id).one(db).await?;
        Ok(video.map(|v| VideoDto::from_entity(v, storage)))
    }

    /// Newest first; `search` is a case-insensitive substring match on title.
    pub async fn get_paged(
        db: &DatabaseConnection,
        storage: &dyn StorageService,
        page: u64,
        page_size: u64,
        search: Option<String>,
    ) -> Result<PagedResult<VideoDto>, AppError> {
        let mut query = Videos::find();
        if let Some(search) = search.filter(|s| !s.trim().is_empty()) {
            let pattern = format!("%{}%", search.trim().to_lowercase());
            query = query.filter(
                Condition::all()
                    .add(Expr::expr(Func::lower(Expr::col(videos::Column::Title))).like(pattern)),
            );
        }

        let total = query.clone().count(db).await?;
        let rows = query
            .order_by_desc(videos::Column::CreatedAt)
            .order_by_desc(videos::Column::Id)
            .offset(page.saturating_sub(1) * page_size)
            .limit(page_size)
            .all(db)
            .await?;

        let items = rows
            .into_iter()
            .map(|v| VideoDto::from_entity(v, storage))
            .collect();

        Ok(PagedResult::new(items, page, page_size, total))
    }
}
