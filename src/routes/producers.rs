//! Producer routes: CRUD over rural producers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::producer::{CreateProducer, Producer, UpdateProducer};
use crate::AppState;

/// GET /api/v1/producers: all producers ordered by name.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Producer>>, AppError> {
    let producers = state.services.producers.list().await?;
    Ok(Json(producers))
}

/// POST /api/v1/producers: register a producer by CPF or CNPJ.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateProducer>,
) -> Result<(StatusCode, Json<Producer>), AppError> {
    let producer = state.services.producers.create(body).await?;
    Ok((StatusCode::CREATED, Json(producer)))
}

/// GET /api/v1/producers/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Producer>, AppError> {
    let producer = state.services.producers.get(id).await?;
    Ok(Json(producer))
}

/// PUT /api/v1/producers/{id}: partial update.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateProducer>,
) -> Result<Json<Producer>, AppError> {
    let producer = state.services.producers.update(id, body).await?;
    Ok(Json(producer))
}

/// DELETE /api/v1/producers/{id}: refused while the producer owns farms.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.services.producers.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
