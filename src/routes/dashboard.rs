//! Dashboard routes: aggregated farm and crop metrics.

use axum::{
    extract::{Query, State},
    Json,
};
use validator::Validate;

use crate::errors::AppError;
use crate::models::dashboard::{DashboardFilter, MetricsReport};
use crate::AppState;

/// GET /api/v1/dashboard/metrics: metrics over the farms matching the query filters.
pub async fn metrics(
    State(state): State<AppState>,
    Query(filter): Query<DashboardFilter>,
) -> Result<Json<MetricsReport>, AppError> {
    filter.validate()?;
    let report = state.services.dashboard.get_metrics(filter).await?;
    Ok(Json(report))
}
