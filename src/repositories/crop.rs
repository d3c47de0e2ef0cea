use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::farm::GroupCount;
use super::filters::{bind_filters, FarmConditions};
use crate::errors::{map_constraint_error, AppError, ForeignKeyContext};
use crate::models::crop::Crop;
use crate::models::dashboard::DashboardFilter;
use crate::services::dashboard::CropQueryPort;

pub(crate) const DUPLICATE_CROP: &str = "Crop already registered for this season";
const UNKNOWN_REFERENCE: &str = "Referenced farm or season does not exist";

/// Persistence for crops.
#[async_trait]
pub trait CropRepository: Send + Sync {
    async fn create(&self, crop: Crop) -> Result<Crop, AppError>;

    /// All crops ordered by name.
    async fn find_all(&self) -> Result<Vec<Crop>, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Crop>, AppError>;

    async fn update(&self, crop: Crop) -> Result<Crop, AppError>;

    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;

    async fn count_by_farm(&self, farm_id: Uuid) -> Result<i64, AppError>;

    async fn count_by_season(&self, season_id: Uuid) -> Result<i64, AppError>;

    /// Whether another crop with the same trimmed, case-folded name exists on
    /// this farm in this season.
    async fn exists_by_name(
        &self,
        farm_id: Uuid,
        season_id: Uuid,
        name: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, AppError>;
}

/// In-memory implementation (for development/testing).
#[derive(Debug, Default, Clone)]
pub struct InMemoryCropRepository {
    crops: Arc<RwLock<HashMap<Uuid, Crop>>>,
}

impl InMemoryCropRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn same_slot(crop: &Crop, farm_id: Uuid, season_id: Uuid, key: &str) -> bool {
    crop.farm_id == farm_id && crop.season_id == season_id && Crop::name_key(&crop.name) == key
}

#[async_trait]
impl CropRepository for InMemoryCropRepository {
    async fn create(&self, crop: Crop) -> Result<Crop, AppError> {
        let mut crops = self.crops.write().await;
        let key = Crop::name_key(&crop.name);
        if crops
            .values()
            .any(|c| same_slot(c, crop.farm_id, crop.season_id, &key))
        {
            return Err(AppError::Conflict(DUPLICATE_CROP.to_string()));
        }
        crops.insert(crop.id, crop.clone());
        Ok(crop)
    }

    async fn find_all(&self) -> Result<Vec<Crop>, AppError> {
        let crops = self.crops.read().await;
        let mut result: Vec<Crop> = crops.values().cloned().collect();
        result.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(result)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Crop>, AppError> {
        Ok(self.crops.read().await.get(&id).cloned())
    }

    async fn update(&self, crop: Crop) -> Result<Crop, AppError> {
        let mut crops = self.crops.write().await;
        let key = Crop::name_key(&crop.name);
        if crops
            .values()
            .any(|c| c.id != crop.id && same_slot(c, crop.farm_id, crop.season_id, &key))
        {
            return Err(AppError::Conflict(DUPLICATE_CROP.to_string()));
        }
        let slot = crops
            .get_mut(&crop.id)
            .ok_or_else(|| AppError::NotFound("Crop not found".to_string()))?;
        *slot = crop.clone();
        Ok(crop)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.crops.write().await.remove(&id).is_some())
    }

    async fn count_by_farm(&self, farm_id: Uuid) -> Result<i64, AppError> {
        let crops = self.crops.read().await;
        Ok(crops.values().filter(|c| c.farm_id == farm_id).count() as i64)
    }

    async fn count_by_season(&self, season_id: Uuid) -> Result<i64, AppError> {
        let crops = self.crops.read().await;
        Ok(crops.values().filter(|c| c.season_id == season_id).count() as i64)
    }

    async fn exists_by_name(
        &self,
        farm_id: Uuid,
        season_id: Uuid,
        name: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let crops = self.crops.read().await;
        let key = Crop::name_key(name);
        Ok(crops
            .values()
            .any(|c| Some(c.id) != exclude_id && same_slot(c, farm_id, season_id, &key)))
    }
}

/// PostgreSQL implementation; also answers the dashboard's crop query.
#[derive(Debug, Clone)]
pub struct PgCropRepository {
    pool: PgPool,
}

impl PgCropRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CropRepository for PgCropRepository {
    async fn create(&self, crop: Crop) -> Result<Crop, AppError> {
        sqlx::query_as::<_, Crop>(
            r#"
            INSERT INTO crops (id, name, season_id, farm_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(crop.id)
        .bind(&crop.name)
        .bind(crop.season_id)
        .bind(crop.farm_id)
        .bind(crop.created_at)
        .bind(crop.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            map_constraint_error(
                e,
                Some(DUPLICATE_CROP),
                Some(ForeignKeyContext::Write(UNKNOWN_REFERENCE)),
            )
        })
    }

    async fn find_all(&self) -> Result<Vec<Crop>, AppError> {
        let rows = sqlx::query_as::<_, Crop>("SELECT * FROM crops ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Crop>, AppError> {
        let row = sqlx::query_as::<_, Crop>("SELECT * FROM crops WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update(&self, crop: Crop) -> Result<Crop, AppError> {
        sqlx::query_as::<_, Crop>(
            r#"
            UPDATE crops SET
                name = $2,
                season_id = $3,
                farm_id = $4,
                updated_at = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(crop.id)
        .bind(&crop.name)
        .bind(crop.season_id)
        .bind(crop.farm_id)
        .bind(crop.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            map_constraint_error(
                e,
                Some(DUPLICATE_CROP),
                Some(ForeignKeyContext::Write(UNKNOWN_REFERENCE)),
            )
        })?
        .ok_or_else(|| AppError::NotFound("Crop not found".to_string()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM crops WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_by_farm(&self, farm_id: Uuid) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM crops WHERE farm_id = $1")
            .bind(farm_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn count_by_season(&self, season_id: Uuid) -> Result<i64, AppError> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM crops WHERE season_id = $1")
                .bind(season_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    async fn exists_by_name(
        &self,
        farm_id: Uuid,
        season_id: Uuid,
        name: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM crops
                WHERE farm_id = $1
                  AND season_id = $2
                  AND LOWER(TRIM(name)) = LOWER(TRIM($3))
                  AND ($4::uuid IS NULL OR id <> $4)
            )
            "#,
        )
        .bind(farm_id)
        .bind(season_id)
        .bind(name)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }
}

#[async_trait]
impl CropQueryPort for PgCropRepository {
    async fn group_by_crop(
        &self,
        filter: &DashboardFilter,
    ) -> Result<BTreeMap<String, i64>, AppError> {
        let c = FarmConditions::from_filter(filter);
        let sql = format!(
            r#"
            SELECT c.name AS key, COUNT(*) AS count
            FROM crops c
            INNER JOIN farms f ON f.id = c.farm_id
            {}
            GROUP BY c.name
            "#,
            c.where_clause()
        );
        let rows = bind_filters!(sqlx::query_as::<_, GroupCount>(&sql), &c.binds)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|r| (r.key, r.count)).collect())
    }
}
