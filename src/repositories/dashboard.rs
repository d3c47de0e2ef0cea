//! In-memory answers to the dashboard queries, evaluated over the shared
//! in-memory farm and crop collections.

use std::collections::{BTreeMap, HashMap, HashSet};

use async_trait::async_trait;
use uuid::Uuid;

use super::crop::{CropRepository, InMemoryCropRepository};
use super::farm::{FarmRepository, InMemoryFarmRepository};
use crate::errors::AppError;
use crate::models::crop::Crop;
use crate::models::dashboard::{DashboardFilter, LandUse};
use crate::models::farm::Farm;
use crate::services::dashboard::{CropQueryPort, FarmQueryPort};

#[derive(Debug, Default, Clone)]
pub struct InMemoryDashboardQueries {
    farms: InMemoryFarmRepository,
    crops: InMemoryCropRepository,
}

impl InMemoryDashboardQueries {
    /// Query over the same collections the given repositories write to.
    pub fn new(farms: InMemoryFarmRepository, crops: InMemoryCropRepository) -> Self {
        Self { farms, crops }
    }

    /// Farms passing the filter, together with every stored crop.
    async fn qualifying(
        &self,
        filter: &DashboardFilter,
    ) -> Result<(Vec<Farm>, Vec<Crop>), AppError> {
        let farms = self.farms.find_all().await?;
        let crops = self.crops.find_all().await?;

        let mut names_by_farm: HashMap<Uuid, Vec<&str>> = HashMap::new();
        for crop in &crops {
            names_by_farm
                .entry(crop.farm_id)
                .or_default()
                .push(crop.name.as_str());
        }

        let qualifying = farms
            .into_iter()
            .filter(|farm| {
                let names = names_by_farm.get(&farm.id).map(Vec::as_slice).unwrap_or(&[]);
                filter.matches(farm, names.iter().copied())
            })
            .collect();
        Ok((qualifying, crops))
    }
}

#[async_trait]
impl FarmQueryPort for InMemoryDashboardQueries {
    async fn count_by_filters(&self, filter: &DashboardFilter) -> Result<i64, AppError> {
        let (farms, _) = self.qualifying(filter).await?;
        Ok(farms.len() as i64)
    }

    async fn sum_area_total_by_filters(&self, filter: &DashboardFilter) -> Result<f64, AppError> {
        let (farms, _) = self.qualifying(filter).await?;
        Ok(farms.iter().fold(0.0, |acc, f| acc + f.total_area))
    }

    async fn group_by_state(
        &self,
        filter: &DashboardFilter,
    ) -> Result<BTreeMap<String, i64>, AppError> {
        let (farms, _) = self.qualifying(filter).await?;
        let mut groups = BTreeMap::new();
        for state in farms.into_iter().filter_map(|f| f.state) {
            *groups.entry(state).or_insert(0) += 1;
        }
        Ok(groups)
    }

    async fn sum_land_use_by_filters(&self, filter: &DashboardFilter) -> Result<LandUse, AppError> {
        let (farms, _) = self.qualifying(filter).await?;
        Ok(farms.iter().fold(LandUse::default(), |acc, f| LandUse {
            arable: acc.arable + f.arable_area,
            vegetation: acc.vegetation + f.vegetation_area,
        }))
    }
}

#[async_trait]
impl CropQueryPort for InMemoryDashboardQueries {
    async fn group_by_crop(
        &self,
        filter: &DashboardFilter,
    ) -> Result<BTreeMap<String, i64>, AppError> {
        let (farms, crops) = self.qualifying(filter).await?;
        let farm_ids: HashSet<Uuid> = farms.iter().map(|f| f.id).collect();
        let mut groups = BTreeMap::new();
        for crop in crops.into_iter().filter(|c| farm_ids.contains(&c.farm_id)) {
            *groups.entry(crop.name).or_insert(0) += 1;
        }
        Ok(groups)
    }
}
