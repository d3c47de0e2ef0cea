//! Route definitions for the agro registry API.

pub mod crops;
pub mod dashboard;
pub mod farms;
pub mod health;
pub mod producers;
pub mod seasons;

use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use crate::AppState;

/// Request bodies are small JSON documents.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.frontend_url);

    let producer_routes = Router::new()
        .route("/producers", get(producers::list).post(producers::create))
        .route(
            "/producers/{id}",
            get(producers::get_by_id)
                .put(producers::update)
                .delete(producers::delete),
        );

    let farm_routes = Router::new()
        .route("/farms", get(farms::list).post(farms::create))
        .route(
            "/farms/{id}",
            get(farms::get_by_id).put(farms::update).delete(farms::delete),
        );

    let season_routes = Router::new()
        .route("/seasons", get(seasons::list).post(seasons::create))
        .route(
            "/seasons/{id}",
            get(seasons::get_by_id)
                .put(seasons::update)
                .delete(seasons::delete),
        );

    let crop_routes = Router::new()
        .route("/crops", get(crops::list).post(crops::create))
        .route(
            "/crops/{id}",
            get(crops::get_by_id).put(crops::update).delete(crops::delete),
        );

    let dashboard_routes = Router::new().route("/dashboard/metrics", get(dashboard::metrics));

    Router::new()
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .nest("/api/v1", producer_routes)
        .nest("/api/v1", farm_routes)
        .nest("/api/v1", season_routes)
        .nest("/api/v1", crop_routes)
        .nest("/api/v1", dashboard_routes)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Allow the configured frontend origin; fall back to any origin if it is not a valid header.
fn cors_layer(frontend_url: &str) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);
    match HeaderValue::from_str(frontend_url) {
        Ok(origin) => cors.allow_origin(origin),
        Err(e) => {
            tracing::warn!(
                error = %e,
                origin = frontend_url,
                "Invalid FRONTEND_URL, allowing any origin"
            );
            cors.allow_origin(Any)
        }
    }
}
