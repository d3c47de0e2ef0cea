pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

use sqlx::PgPool;

use crate::repositories::Repositories;
use crate::services::Services;

/// Shared application state passed to all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: config::AppConfig,
    /// Present when backed by PostgreSQL; probed by the readiness check.
    pub db: Option<PgPool>,
    pub services: Services,
}

impl AppState {
    pub fn postgres(config: config::AppConfig, pool: PgPool) -> Self {
        Self {
            config,
            services: Services::new(Repositories::postgres(pool.clone())),
            db: Some(pool),
        }
    }

    /// State over empty in-memory stores.
    pub fn in_memory(config: config::AppConfig) -> Self {
        Self {
            config,
            db: None,
            services: Services::new(Repositories::in_memory()),
        }
    }
}
