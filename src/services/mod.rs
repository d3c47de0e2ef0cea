//! Business logic services.

pub mod crop;
pub mod dashboard;
pub mod farm;
pub mod producer;
pub mod season;

use crate::repositories::Repositories;

pub use crop::CropService;
pub use dashboard::DashboardService;
pub use farm::FarmService;
pub use producer::ProducerService;
pub use season::SeasonService;

/// One service per module, sharing the same stores.
#[derive(Clone)]
pub struct Services {
    pub producers: ProducerService,
    pub farms: FarmService,
    pub seasons: SeasonService,
    pub crops: CropService,
    pub dashboard: DashboardService,
}

impl Services {
    pub fn new(repos: Repositories) -> Self {
        Self {
            producers: ProducerService::new(repos.producers.clone(), repos.farms.clone()),
            farms: FarmService::new(
                repos.farms.clone(),
                repos.producers.clone(),
                repos.crops.clone(),
            ),
            seasons: SeasonService::new(repos.seasons.clone(), repos.crops.clone()),
            crops: CropService::new(repos.crops, repos.farms, repos.seasons),
            dashboard: DashboardService::new(repos.farm_queries, repos.crop_queries),
        }
    }
}
