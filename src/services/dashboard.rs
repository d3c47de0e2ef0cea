//! Dashboard metrics aggregation over farms and crops.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::dashboard::{Charts, DashboardFilter, LandUse, MetricsReport};

/// Read-only farm aggregates over the population qualifying for a filter.
#[async_trait]
pub trait FarmQueryPort: Send + Sync {
    async fn count_by_filters(&self, filter: &DashboardFilter) -> Result<i64, AppError>;

    async fn sum_area_total_by_filters(&self, filter: &DashboardFilter) -> Result<f64, AppError>;

    /// Farm count per state. Farms without a state are left out.
    async fn group_by_state(
        &self,
        filter: &DashboardFilter,
    ) -> Result<BTreeMap<String, i64>, AppError>;

    async fn sum_land_use_by_filters(&self, filter: &DashboardFilter) -> Result<LandUse, AppError>;
}

/// Read-only crop aggregates scoped to the farms qualifying for a filter.
#[async_trait]
pub trait CropQueryPort: Send + Sync {
    /// Crop associations per exact crop name.
    async fn group_by_crop(
        &self,
        filter: &DashboardFilter,
    ) -> Result<BTreeMap<String, i64>, AppError>;
}

#[derive(Clone)]
pub struct DashboardService {
    farms: Arc<dyn FarmQueryPort>,
    crops: Arc<dyn CropQueryPort>,
}

impl DashboardService {
    pub fn new(farms: Arc<dyn FarmQueryPort>, crops: Arc<dyn CropQueryPort>) -> Self {
        Self { farms, crops }
    }

    /// Fetch every aggregate in parallel queries. The first failure fails the report.
    pub async fn get_metrics(&self, filter: DashboardFilter) -> Result<MetricsReport, AppError> {
        let (total_farms, total_hectares, by_state, by_land_use, by_crop) = tokio::try_join!(
            self.farms.count_by_filters(&filter),
            self.farms.sum_area_total_by_filters(&filter),
            self.farms.group_by_state(&filter),
            self.farms.sum_land_use_by_filters(&filter),
            self.crops.group_by_crop(&filter),
        )?;

        tracing::debug!(total_farms, total_hectares, "Computed dashboard metrics");

        Ok(MetricsReport {
            total_farms,
            total_hectares,
            charts: Charts {
                by_state,
                by_crop,
                by_land_use,
            },
            applied_filters: filter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::crop::{CreateCrop, Crop};
    use crate::models::farm::{CreateFarm, Farm};
    use crate::repositories::{
        CropRepository, FarmRepository, InMemoryCropRepository, InMemoryDashboardQueries,
        InMemoryFarmRepository,
    };
    use uuid::Uuid;

    /// SP 300 [Soja, Milho], MG 500 [Café], SP 100 [Soja].
    async fn scenario() -> DashboardService {
        let farms = InMemoryFarmRepository::new();
        let crops = InMemoryCropRepository::new();
        let season = Uuid::new_v4();

        let rows: [(&str, &str, f64, f64, f64, &[&str]); 3] = [
            ("Fazenda Santa Rita", "SP", 300.0, 200.0, 100.0, &["Soja", "Milho"]),
            ("Fazenda Serra Verde", "MG", 500.0, 300.0, 200.0, &["Café"]),
            ("Sítio Boa Esperança", "SP", 100.0, 80.0, 20.0, &["Soja"]),
        ];
        for (name, state, total, arable, vegetation, names) in rows {
            let farm = farms
                .create(Farm::new(CreateFarm {
                    producer_id: Uuid::new_v4(),
                    name: name.to_string(),
                    city: None,
                    state: Some(state.to_string()),
                    total_area: total,
                    arable_area: arable,
                    vegetation_area: vegetation,
                }))
                .await
                .unwrap();
            for crop in names {
                crops
                    .create(Crop::new(CreateCrop {
                        name: crop.to_string(),
                        season_id: season,
                        farm_id: farm.id,
                    }))
                    .await
                    .unwrap();
            }
        }

        let queries = Arc::new(InMemoryDashboardQueries::new(farms, crops));
        DashboardService::new(queries.clone(), queries)
    }

    fn filter() -> DashboardFilter {
        DashboardFilter::default()
    }

    #[tokio::test]
    async fn no_filter_covers_whole_population() {
        let report = scenario().await.get_metrics(filter()).await.unwrap();
        assert_eq!(report.total_farms, 3);
        assert_eq!(report.total_hectares, 900.0);
        assert_eq!(
            report.charts.by_state,
            BTreeMap::from([("MG".to_string(), 1), ("SP".to_string(), 2)])
        );
        assert_eq!(
            report.charts.by_crop,
            BTreeMap::from([
                ("Café".to_string(), 1),
                ("Milho".to_string(), 1),
                ("Soja".to_string(), 2),
            ])
        );
        assert_eq!(
            report.charts.by_land_use,
            LandUse {
                arable: 580.0,
                vegetation: 320.0
            }
        );
    }

    #[tokio::test]
    async fn state_filter_scopes_every_aggregate() {
        let report = scenario()
            .await
            .get_metrics(DashboardFilter {
                state: Some("SP".to_string()),
                ..filter()
            })
            .await
            .unwrap();
        assert_eq!(report.total_farms, 2);
        assert_eq!(report.total_hectares, 400.0);
        assert_eq!(report.charts.by_state, BTreeMap::from([("SP".to_string(), 2)]));
        // Café only grows in MG.
        assert_eq!(
            report.charts.by_crop,
            BTreeMap::from([("Milho".to_string(), 1), ("Soja".to_string(), 2)])
        );
    }

    #[tokio::test]
    async fn crop_filter_counts_distinct_farms() {
        let service = scenario().await;

        let cafe = service
            .get_metrics(DashboardFilter {
                crop: Some("Café".to_string()),
                ..filter()
            })
            .await
            .unwrap();
        assert_eq!(cafe.total_farms, 1);
        assert_eq!(cafe.total_hectares, 500.0);

        let soja = service
            .get_metrics(DashboardFilter {
                crop: Some("Soja".to_string()),
                ..filter()
            })
            .await
            .unwrap();
        assert_eq!(soja.total_farms, 2);
        // Co-occurring crops of qualifying farms are still counted.
        assert_eq!(soja.charts.by_crop.get("Milho"), Some(&1));
    }

    #[tokio::test]
    async fn area_bounds_are_inclusive_and_inverted_bounds_match_nothing() {
        let service = scenario().await;

        let min_only = service
            .get_metrics(DashboardFilter {
                area_min: Some(400.0),
                ..filter()
            })
            .await
            .unwrap();
        assert_eq!(min_only.total_farms, 1);
        assert_eq!(min_only.total_hectares, 500.0);

        let exact = service
            .get_metrics(DashboardFilter {
                area_min: Some(100.0),
                area_max: Some(300.0),
                ..filter()
            })
            .await
            .unwrap();
        assert_eq!(exact.total_farms, 2);

        let inverted = service
            .get_metrics(DashboardFilter {
                area_min: Some(500.0),
                area_max: Some(100.0),
                ..filter()
            })
            .await
            .unwrap();
        assert_eq!(inverted.total_farms, 0);
    }

    #[tokio::test]
    async fn combined_filters_intersect() {
        let service = scenario().await;

        let sp_soja = service
            .get_metrics(DashboardFilter {
                state: Some("SP".to_string()),
                crop: Some("Soja".to_string()),
                ..filter()
            })
            .await
            .unwrap();
        assert_eq!(sp_soja.total_farms, 2);
        assert_eq!(sp_soja.total_hectares, 400.0);

        let mg_soja = service
            .get_metrics(DashboardFilter {
                state: Some("MG".to_string()),
                crop: Some("Soja".to_string()),
                ..filter()
            })
            .await
            .unwrap();
        assert_eq!(mg_soja.total_farms, 0);
    }

    #[tokio::test]
    async fn empty_population_yields_zeros_and_empty_maps() {
        let report = scenario()
            .await
            .get_metrics(DashboardFilter {
                search: Some("inexistente".to_string()),
                ..filter()
            })
            .await
            .unwrap();
        assert_eq!(report.total_farms, 0);
        assert_eq!(report.total_hectares, 0.0);
        assert!(report.total_hectares.is_sign_positive());
        assert!(report.charts.by_state.is_empty());
        assert!(report.charts.by_crop.is_empty());
        assert_eq!(report.charts.by_land_use, LandUse::default());
    }

    #[tokio::test]
    async fn applied_filters_echo_input() {
        let input = DashboardFilter {
            search: Some("santa".to_string()),
            area_max: Some(1000.0),
            ..filter()
        };
        let report = scenario().await.get_metrics(input.clone()).await.unwrap();
        assert_eq!(report.applied_filters, input);
        assert_eq!(report.total_farms, 1);
    }

    struct Unavailable;

    #[async_trait]
    impl CropQueryPort for Unavailable {
        async fn group_by_crop(
            &self,
            _filter: &DashboardFilter,
        ) -> Result<BTreeMap<String, i64>, AppError> {
            Err(AppError::Internal("crop store unavailable".to_string()))
        }
    }

    #[tokio::test]
    async fn port_failure_propagates_unchanged() {
        let farms = Arc::new(InMemoryDashboardQueries::default());
        let service = DashboardService::new(farms, Arc::new(Unavailable));

        let err = service.get_metrics(filter()).await.unwrap_err();
        assert!(matches!(err, AppError::Internal(msg) if msg == "crop store unavailable"));
    }
}
