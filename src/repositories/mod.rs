//! Persistence traits with PostgreSQL and in-memory implementations.

pub mod crop;
pub mod dashboard;
pub mod farm;
pub mod filters;
pub mod producer;
pub mod season;

use std::sync::Arc;

use sqlx::PgPool;

pub use crop::{CropRepository, InMemoryCropRepository, PgCropRepository};
pub use dashboard::InMemoryDashboardQueries;
pub use farm::{FarmRepository, InMemoryFarmRepository, PgFarmRepository};
pub use producer::{InMemoryProducerRepository, PgProducerRepository, ProducerRepository};
pub use season::{InMemorySeasonRepository, PgSeasonRepository, SeasonRepository};

use crate::services::dashboard::{CropQueryPort, FarmQueryPort};

/// Every store the services need, behind trait objects.
#[derive(Clone)]
pub struct Repositories {
    pub producers: Arc<dyn ProducerRepository>,
    pub farms: Arc<dyn FarmRepository>,
    pub seasons: Arc<dyn SeasonRepository>,
    pub crops: Arc<dyn CropRepository>,
    pub farm_queries: Arc<dyn FarmQueryPort>,
    pub crop_queries: Arc<dyn CropQueryPort>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        let farms = Arc::new(PgFarmRepository::new(pool.clone()));
        let crops = Arc::new(PgCropRepository::new(pool.clone()));
        Self {
            producers: Arc::new(PgProducerRepository::new(pool.clone())),
            seasons: Arc::new(PgSeasonRepository::new(pool)),
            farms: farms.clone(),
            crops: crops.clone(),
            farm_queries: farms,
            crop_queries: crops,
        }
    }

    /// Fresh, empty stores; the dashboard reads the same farm and crop maps.
    pub fn in_memory() -> Self {
        let farms = InMemoryFarmRepository::new();
        let crops = InMemoryCropRepository::new();
        let queries = Arc::new(InMemoryDashboardQueries::new(farms.clone(), crops.clone()));
        Self {
            producers: Arc::new(InMemoryProducerRepository::new()),
            seasons: Arc::new(InMemorySeasonRepository::new()),
            farms: Arc::new(farms),
            crops: Arc::new(crops),
            farm_queries: queries.clone(),
            crop_queries: queries,
        }
    }
}
