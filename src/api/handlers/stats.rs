use crate::api::error::AppError;
use crate::models::DashboardSummary;
use crate::services::stats_service::StatsService;
use axum::{Json, extract::State};

#[utoipa::path(
    get,
    path = "/api/stats/summary",
    responses(
        (status = 200, description = "Dashboard totals", body = DashboardSummary),
        (status = 401, description = "Unauthorized")
    ),
    security(("jwt" = [])),
    tag = "stats"
)]
pub async fn summary(
    State(state): State<crate::AppState>,
) -> Result<Json<DashboardSummary>, AppError> {
    let summary = StatsService::dashboard_summary(&state.db).await?;
    Ok(Json(summary))
}
