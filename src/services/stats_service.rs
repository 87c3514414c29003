use crate::api::error::AppError;
use crate::entities::prelude::*;
use crate::models::DashboardSummary;
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};

pub struct StatsService;

impl StatsService {
    /// Dashboard totals. The four counts are independent, so they are issued
    /// concurrently.
    pub async fn dashboard_summary(db: &DatabaseConnection) -> Result<DashboardSummary, AppError> {
        let (video_count, qr_code_count, scan_count, play_count) = tokio::try_join!(
            Videos::find().count(db),
            QrCodes::find().count(db),
            ScanLogs::find().count(db),
            PlayLogs::find().count(db),
        )?;

        Ok(DashboardSummary {
            video_count,
            qr_code_count,
            scan_count,
            play_count,
        })
    }
}
