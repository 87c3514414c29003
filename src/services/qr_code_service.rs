use crate::api::error::AppError;
use crate::config::AppConfig;
use crate::entities::{prelude::*, *};
use crate::models::{PagedResult, QrCodeDto, ScanResult, VideoDto};
use crate::services::qr_generator;
use crate::services::storage::StorageService;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, SqlErr,
};
use uuid::Uuid;

const CODE_ALLOC_ATTEMPTS: u32 = 3;

pub struct QrCodeService;

impl QrCodeService {
    /// Mint an opaque code value: 32 lowercase hex characters.
    pub fn generate_code_value() -> String {
        Uuid::new_v4().simple().to_string()
    }

    /// Pull the code value out of scanned input. Accepts either a bare code or
    /// a play URL (`.../play/{value}`, matched case-insensitively); the value
    /// runs up to the next `/`, `?` or `#`. Empty input yields `None`.
    pub fn extract_code_value(input: &str) -> Option<&str> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }

        let lower = trimmed.to_ascii_lowercase();
        let Some(pos) = lower.find("/play/") else {
            return Some(trimmed);
        };

        let rest = &trimmed[pos + "/play/".len()..];
        let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
        let value = &rest[..end];
        if value.is_empty() { None } else { Some(value) }
    }

    /// Bind a new code to an existing video.
    pub async fn create(
        db: &DatabaseConnection,
        video_id: String,
        description: Option<String>,
        is_active: bool,
    ) -> Result<QrCodeDto, AppError> {
        let video = Videos::find_by_id(&video_id)
            .one(db)
            .await?
            .ok_or(AppError::NotFound("Video not found".to_string()))?;

        // A collision on the 128-bit code space is practically unreachable,
        // but the unique index is the authority; retry with a fresh value.
        let mut attempts = 0;
        let qr_code = loop {
            let model = qr_codes::ActiveModel {
                id: Set(Uuid::new_v4().to_string()),
                code_value: Set(Self::generate_code_value()),
                video_id: Set(video.id.clone()),
                is_active: Set(is_active),
                description: Set(description.clone()),
                created_at: Set(Utc::now()),
                updated_at: Set(None),
            };

            match model.insert(db).await {
                Ok(inserted) => break inserted,
                Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                    attempts += 1;
                    if attempts >= CODE_ALLOC_ATTEMPTS {
                        return Err(AppError::Conflict(
                            "Could not allocate a unique code value".to_string(),
                        ));
                    }
                }
                Err(e) => return Err(e.into()),
            }
        };

        tracing::info!("QR code {} created for video {}", qr_code.id, video.id);
        Ok(QrCodeDto::from_entity(qr_code, Some(&video)))
    }

    /// Update description/active flag and optionally rebind to another video.
    /// The code value itself is immutable; mint a new QR code to rotate it.
    pub async fn update(
        db: &DatabaseConnection,
        id: &str,
        video_id: Option<String>,
        description: Option<String>,
        is_active: bool,
    ) -> Result<QrCodeDto, AppError> {
        let qr_code = QrCodes::find_by_id(id)
            .one(db)
            .await?
            .ok_or(AppError::NotFound("QR code not found".to_string()))?;

        let target_video_id = match video_id {
            Some(new_id) if new_id != qr_code.video_id => {
                Videos::find_by_id(&new_id)
                    .one(db)
                    .await?
                    .ok_or(AppError::NotFound("Video not found".to_string()))?;
                new_id
            }
            _ => qr_code.video_id.clone(),
        };

        let mut model: qr_codes::ActiveModel = qr_code.into();
        model.video_id = Set(target_video_id);
        model.description = Set(description);
        model.is_active = Set(is_active);
        model.updated_at = Set(Some(Utc::now()));
        let updated = model.update(db).await?;

        let video = Videos::find_by_id(&updated.video_id).one(db).await?;
        tracing::info!("QR code {} updated", updated.id);
        Ok(QrCodeDto::from_entity(updated, video.as_ref()))
    }

    /// Remove a code; its scan logs go with it via the store's cascade.
    pub async fn delete(db: &DatabaseConnection, id: &str) -> Result<(), AppError> {
        let qr_code = QrCodes::find_by_id(id)
            .one(db)
            .await?
            .ok_or(AppError::NotFound("QR code not found".to_string()))?;

        let model: qr_codes::ActiveModel = qr_code.into();
        model.delete(db).await?;
        tracing::info!("QR code {} deleted", id);
        Ok(())
    }

    /// Absence is a valid read result, not an error.
    pub async fn get_by_id(
        db: &DatabaseConnection,
        id: &str,
    ) -> Result<Option<QrCodeDto>, AppError> {
        let found = QrCodes::find_by_id(id)
            .find_also_related(Videos)
            .one(db)
            .await?;

        Ok(found.map(|(qr, video)| QrCodeDto::from_entity(qr, video.as_ref())))
    }

    pub async fn get_paged(
        db: &DatabaseConnection,
        page: u64,
        page_size: u64,
        video_id: Option<String>,
    ) -> Result<PagedResult<QrCodeDto>, AppError> {
        let mut query = QrCodes::find();
        if let Some(video_id) = video_id {
            query = query.filter(qr_codes::Column::VideoId.eq(video_id));
        }

        let total = query.clone().count(db).await?;
        let rows = query
            .find_also_related(Videos)
            .order_by_desc(qr_codes::Column::CreatedAt)
            .order_by_desc(qr_codes::Column::Id)
            .offset(page.saturating_sub(1) * page_size)
            .limit(page_size)
            .all(db)
            .await?;

        let items = rows
            .into_iter()
            .map(|(qr, video)| QrCodeDto::from_entity(qr, video.as_ref()))
            .collect();

        Ok(PagedResult::new(items, page, page_size, total))
    }

    /// Render the PNG image for a code. The payload is a full play URL when a
    /// player base URL is configured, otherwise the bare code value.
    pub async fn generate_image(
        db: &DatabaseConnection,
        config: &AppConfig,
        id: &str,
    ) -> Result<Vec<u8>, AppError> {
        let qr_code = QrCodes::find_by_id(id)
            .one(db)
            .await?
            .ok_or(AppError::NotFound("QR code not found".to_string()))?;

        let payload = if config.play_base_url.trim().is_empty() {
            qr_code.code_value
        } else {
            format!(
                "{}/play/{}",
                config.play_base_url.trim_end_matches('/'),
                qr_code.code_value
            )
        };

        qr_generator::encode_png(&payload).map_err(AppError::from)
    }

    /// Map scanned/typed input to a playable video; `None` for anything that
    /// should not play. The caller cannot distinguish an unknown code, an
    /// inactive code, or an inactive/missing video.
    pub async fn resolve(
        db: &DatabaseConnection,
        storage: &dyn StorageService,
        input: &str,
    ) -> Result<Option<ScanResult>, AppError> {
        let Some(code_value) = Self::extract_code_value(input) else {
            return Ok(None);
        };

        let found = QrCodes::find()
            .filter(qr_codes::Column::CodeValue.eq(code_value))
            .find_also_related(Videos)
            .one(db)
            .await?;

        let Some((qr_code, video)) = found else {
            return Ok(None);
        };
        if !qr_code.is_active {
            return Ok(None);
        }
        let Some(video) = video else {
            return Ok(None);
        };
        if !video.is_active {
            return Ok(None);
        }

        let qr_dto = QrCodeDto::from_entity(qr_code, Some(&video));
        let video_dto = VideoDto::from_entity(video, storage);
        Ok(Some(ScanResult {
            qr_code: qr_dto,
            video: video_dto,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_value_shape() {
        let code = QrCodeService::generate_code_value();
        assert_eq!(code.len(), 32);
        assert!(code.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_extract_bare_code() {
        assert_eq!(QrCodeService::extract_code_value("  abc123  "), Some("abc123"));
    }

    #[test]
    fn test_extract_from_play_url() {
        assert_eq!(
            QrCodeService::extract_code_value("https://host.example/play/abc123"),
            Some("abc123")
        );
        assert_eq!(
            QrCodeService::extract_code_value("https://host.example/PLAY/abc123?utm=x"),
            Some("abc123")
        );
        assert_eq!(
            QrCodeService::extract_code_value("https://host.example/play/abc123#frag"),
            Some("abc123")
        );
        assert_eq!(
            QrCodeService::extract_code_value("https://host.example/play/abc123/extra"),
            Some("abc123")
        );
    }

    #[test]
    fn test_extract_preserves_code_case() {
        // Only the path marker is case-insensitive; the value is not folded.
        assert_eq!(
            QrCodeService::extract_code_value("https://host.example/Play/AbC123"),
            Some("AbC123")
        );
    }

    #[test]
    fn test_extract_rejects_empty() {
        assert_eq!(QrCodeService::extract_code_value(""), None);
        assert_eq!(QrCodeService::extract_code_value("   "), None);
        assert_eq!(QrCodeService::extract_code_value("https://host.example/play/"), None);
    }
}
