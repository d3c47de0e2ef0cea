use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::filters::{bind_filters, FarmConditions};
use crate::errors::{map_constraint_error, AppError, ForeignKeyContext};
use crate::models::dashboard::{DashboardFilter, LandUse};
use crate::models::farm::Farm;
use crate::services::dashboard::FarmQueryPort;

const UNKNOWN_PRODUCER: &str = "Referenced producer does not exist";

/// Persistence for farms.
#[async_trait]
pub trait FarmRepository: Send + Sync {
    async fn create(&self, farm: Farm) -> Result<Farm, AppError>;

    /// All farms ordered by name.
    async fn find_all(&self) -> Result<Vec<Farm>, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Farm>, AppError>;

    async fn update(&self, farm: Farm) -> Result<Farm, AppError>;

    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;

    async fn count_by_producer(&self, producer_id: Uuid) -> Result<i64, AppError>;
}

/// In-memory implementation (for development/testing).
#[derive(Debug, Default, Clone)]
pub struct InMemoryFarmRepository {
    farms: Arc<RwLock<HashMap<Uuid, Farm>>>,
}

impl InMemoryFarmRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FarmRepository for InMemoryFarmRepository {
    async fn create(&self, farm: Farm) -> Result<Farm, AppError> {
        self.farms.write().await.insert(farm.id, farm.clone());
        Ok(farm)
    }

    async fn find_all(&self) -> Result<Vec<Farm>, AppError> {
        let farms = self.farms.read().await;
        let mut result: Vec<Farm> = farms.values().cloned().collect();
        result.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(result)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Farm>, AppError> {
        Ok(self.farms.read().await.get(&id).cloned())
    }

    async fn update(&self, farm: Farm) -> Result<Farm, AppError> {
        let mut farms = self.farms.write().await;
        let slot = farms
            .get_mut(&farm.id)
            .ok_or_else(|| AppError::NotFound("Farm not found".to_string()))?;
        *slot = farm.clone();
        Ok(farm)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.farms.write().await.remove(&id).is_some())
    }

    async fn count_by_producer(&self, producer_id: Uuid) -> Result<i64, AppError> {
        let farms = self.farms.read().await;
        Ok(farms.values().filter(|f| f.producer_id == producer_id).count() as i64)
    }
}

/// PostgreSQL implementation; also answers the dashboard's farm queries.
#[derive(Debug, Clone)]
pub struct PgFarmRepository {
    pool: PgPool,
}

impl PgFarmRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FarmRepository for PgFarmRepository {
    async fn create(&self, farm: Farm) -> Result<Farm, AppError> {
        sqlx::query_as::<_, Farm>(
            r#"
            INSERT INTO farms (id, producer_id, name, city, state, total_area,
                arable_area, vegetation_area, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(farm.id)
        .bind(farm.producer_id)
        .bind(&farm.name)
        .bind(&farm.city)
        .bind(&farm.state)
        .bind(farm.total_area)
        .bind(farm.arable_area)
        .bind(farm.vegetation_area)
        .bind(farm.created_at)
        .bind(farm.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            map_constraint_error(e, None, Some(ForeignKeyContext::Write(UNKNOWN_PRODUCER)))
        })
    }

    async fn find_all(&self) -> Result<Vec<Farm>, AppError> {
        let rows = sqlx::query_as::<_, Farm>("SELECT * FROM farms ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Farm>, AppError> {
        let row = sqlx::query_as::<_, Farm>("SELECT * FROM farms WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update(&self, farm: Farm) -> Result<Farm, AppError> {
        sqlx::query_as::<_, Farm>(
            r#"
            UPDATE farms SET
                producer_id = $2,
                name = $3,
                city = $4,
                state = $5,
                total_area = $6,
                arable_area = $7,
                vegetation_area = $8,
                updated_at = $9
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(farm.id)
        .bind(farm.producer_id)
        .bind(&farm.name)
        .bind(&farm.city)
        .bind(&farm.state)
        .bind(farm.total_area)
        .bind(farm.arable_area)
        .bind(farm.vegetation_area)
        .bind(farm.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            map_constraint_error(e, None, Some(ForeignKeyContext::Write(UNKNOWN_PRODUCER)))
        })?
        .ok_or_else(|| AppError::NotFound("Farm not found".to_string()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM farms WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                map_constraint_error(
                    e,
                    None,
                    Some(ForeignKeyContext::Delete("Farm still has crops")),
                )
            })?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_by_producer(&self, producer_id: Uuid) -> Result<i64, AppError> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM farms WHERE producer_id = $1")
                .bind(producer_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}

/// One row of a GROUP BY count.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct GroupCount {
    pub key: String,
    pub count: i64,
}

#[async_trait]
impl FarmQueryPort for PgFarmRepository {
    async fn count_by_filters(&self, filter: &DashboardFilter) -> Result<i64, AppError> {
        let c = FarmConditions::from_filter(filter);
        let sql = format!("SELECT COUNT(*) FROM farms f {}", c.where_clause());
        let count = bind_filters!(sqlx::query_scalar::<_, i64>(&sql), &c.binds)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn sum_area_total_by_filters(&self, filter: &DashboardFilter) -> Result<f64, AppError> {
        let c = FarmConditions::from_filter(filter);
        let sql = format!(
            "SELECT COALESCE(SUM(f.total_area), 0)::float8 FROM farms f {}",
            c.where_clause()
        );
        let total = bind_filters!(sqlx::query_scalar::<_, f64>(&sql), &c.binds)
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    async fn group_by_state(
        &self,
        filter: &DashboardFilter,
    ) -> Result<BTreeMap<String, i64>, AppError> {
        let c = FarmConditions::from_filter(filter).and("f.state IS NOT NULL");
        let sql = format!(
            "SELECT f.state AS key, COUNT(*) AS count FROM farms f {} GROUP BY f.state",
            c.where_clause()
        );
        let rows = bind_filters!(sqlx::query_as::<_, GroupCount>(&sql), &c.binds)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|r| (r.key, r.count)).collect())
    }

    async fn sum_land_use_by_filters(&self, filter: &DashboardFilter) -> Result<LandUse, AppError> {
        let c = FarmConditions::from_filter(filter);
        let sql = format!(
            r#"
            SELECT
                COALESCE(SUM(f.arable_area), 0)::float8 AS arable,
                COALESCE(SUM(f.vegetation_area), 0)::float8 AS vegetation
            FROM farms f
            {}
            "#,
            c.where_clause()
        );
        let land_use = bind_filters!(sqlx::query_as::<_, LandUse>(&sql), &c.binds)
            .fetch_one(&self.pool)
            .await?;
        Ok(land_use)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::farm::CreateFarm;

    fn farm(producer_id: Uuid, name: &str) -> Farm {
        Farm::new(CreateFarm {
            producer_id,
            name: name.to_string(),
            city: Some("Uberaba".to_string()),
            state: Some("MG".to_string()),
            total_area: 300.0,
            arable_area: 220.0,
            vegetation_area: 80.0,
        })
    }

    #[tokio::test]
    async fn count_by_producer_counts_only_that_producer() {
        let repo = InMemoryFarmRepository::new();
        let owner = Uuid::new_v4();
        repo.create(farm(owner, "Santa Clara")).await.unwrap();
        repo.create(farm(owner, "Monte Azul")).await.unwrap();
        repo.create(farm(Uuid::new_v4(), "Outra")).await.unwrap();

        assert_eq!(repo.count_by_producer(owner).await.unwrap(), 2);
        assert_eq!(repo.count_by_producer(Uuid::new_v4()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn update_replaces_stored_record() {
        let repo = InMemoryFarmRepository::new();
        let mut created = repo.create(farm(Uuid::new_v4(), "Santa Clara")).await.unwrap();
        created.name = "Santa Clara II".to_string();
        repo.update(created.clone()).await.unwrap();

        let stored = repo.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Santa Clara II");
    }

    #[tokio::test]
    async fn update_unknown_is_not_found() {
        let repo = InMemoryFarmRepository::new();
        let err = repo.update(farm(Uuid::new_v4(), "Ghost")).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
