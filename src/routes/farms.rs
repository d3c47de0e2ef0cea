//! Farm routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::farm::{CreateFarm, Farm, UpdateFarm};
use crate::AppState;

/// GET /api/v1/farms: all farms ordered by name.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Farm>>, AppError> {
    let farms = state.services.farms.list().await?;
    Ok(Json(farms))
}

/// POST /api/v1/farms: register a farm for an existing producer.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateFarm>,
) -> Result<(StatusCode, Json<Farm>), AppError> {
    let farm = state.services.farms.create(body).await?;
    Ok((StatusCode::CREATED, Json(farm)))
}

/// GET /api/v1/farms/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Farm>, AppError> {
    let farm = state.services.farms.get(id).await?;
    Ok(Json(farm))
}

/// PUT /api/v1/farms/{id}: partial update, area sum checked after merge.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateFarm>,
) -> Result<Json<Farm>, AppError> {
    let farm = state.services.farms.update(id, body).await?;
    Ok(Json(farm))
}

/// DELETE /api/v1/farms/{id}: refused while crops reference the farm.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.services.farms.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
