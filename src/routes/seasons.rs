//! Harvest season routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::season::{CreateSeason, Season, UpdateSeason};
use crate::AppState;

/// GET /api/v1/seasons: all seasons ordered by start date.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Season>>, AppError> {
    let seasons = state.services.seasons.list().await?;
    Ok(Json(seasons))
}

/// POST /api/v1/seasons
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateSeason>,
) -> Result<(StatusCode, Json<Season>), AppError> {
    let season = state.services.seasons.create(body).await?;
    Ok((StatusCode::CREATED, Json(season)))
}

/// GET /api/v1/seasons/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Season>, AppError> {
    let season = state.services.seasons.get(id).await?;
    Ok(Json(season))
}

/// PUT /api/v1/seasons/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateSeason>,
) -> Result<Json<Season>, AppError> {
    let season = state.services.seasons.update(id, body).await?;
    Ok(Json(season))
}

/// DELETE /api/v1/seasons/{id}: refused while crops reference the season.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.services.seasons.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
