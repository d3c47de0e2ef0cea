//! Crop routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::crop::{CreateCrop, Crop, UpdateCrop};
use crate::AppState;

/// GET /api/v1/crops: all crops ordered by name.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Crop>>, AppError> {
    let crops = state.services.crops.list().await?;
    Ok(Json(crops))
}

/// POST /api/v1/crops: plant a crop on a farm for a season.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateCrop>,
) -> Result<(StatusCode, Json<Crop>), AppError> {
    let crop = state.services.crops.create(body).await?;
    Ok((StatusCode::CREATED, Json(crop)))
}

/// GET /api/v1/crops/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Crop>, AppError> {
    let crop = state.services.crops.get(id).await?;
    Ok(Json(crop))
}

/// PUT /api/v1/crops/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateCrop>,
) -> Result<Json<Crop>, AppError> {
    let crop = state.services.crops.update(id, body).await?;
    Ok(Json(crop))
}

/// DELETE /api/v1/crops/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.services.crops.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
