use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::{map_constraint_error, AppError, ForeignKeyContext};
use crate::models::season::Season;

/// Persistence for harvest seasons.
#[async_trait]
pub trait SeasonRepository: Send + Sync {
    async fn create(&self, season: Season) -> Result<Season, AppError>;

    /// All seasons ordered by start date.
    async fn find_all(&self) -> Result<Vec<Season>, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Season>, AppError>;

    async fn update(&self, season: Season) -> Result<Season, AppError>;

    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

/// In-memory implementation (for development/testing).
#[derive(Debug, Default, Clone)]
pub struct InMemorySeasonRepository {
    seasons: Arc<RwLock<HashMap<Uuid, Season>>>,
}

impl InMemorySeasonRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SeasonRepository for InMemorySeasonRepository {
    async fn create(&self, season: Season) -> Result<Season, AppError> {
        self.seasons.write().await.insert(season.id, season.clone());
        Ok(season)
    }

    async fn find_all(&self) -> Result<Vec<Season>, AppError> {
        let seasons = self.seasons.read().await;
        let mut result: Vec<Season> = seasons.values().cloned().collect();
        result.sort_by(|a, b| a.start_date.cmp(&b.start_date).then(a.name.cmp(&b.name)));
        Ok(result)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Season>, AppError> {
        Ok(self.seasons.read().await.get(&id).cloned())
    }

    async fn update(&self, season: Season) -> Result<Season, AppError> {
        let mut seasons = self.seasons.write().await;
        let slot = seasons
            .get_mut(&season.id)
            .ok_or_else(|| AppError::NotFound("Season not found".to_string()))?;
        *slot = season.clone();
        Ok(season)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.seasons.write().await.remove(&id).is_some())
    }
}

/// PostgreSQL implementation.
#[derive(Debug, Clone)]
pub struct PgSeasonRepository {
    pool: PgPool,
}

impl PgSeasonRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SeasonRepository for PgSeasonRepository {
    async fn create(&self, season: Season) -> Result<Season, AppError> {
        let row = sqlx::query_as::<_, Season>(
            r#"
            INSERT INTO seasons (id, name, year, start_date, end_date, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(season.id)
        .bind(&season.name)
        .bind(season.year)
        .bind(season.start_date)
        .bind(season.end_date)
        .bind(season.created_at)
        .bind(season.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_all(&self) -> Result<Vec<Season>, AppError> {
        let rows =
            sqlx::query_as::<_, Season>("SELECT * FROM seasons ORDER BY start_date ASC, name ASC")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Season>, AppError> {
        let row = sqlx::query_as::<_, Season>("SELECT * FROM seasons WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update(&self, season: Season) -> Result<Season, AppError> {
        sqlx::query_as::<_, Season>(
            r#"
            UPDATE seasons SET
                name = $2,
                year = $3,
                start_date = $4,
                end_date = $5,
                updated_at = $6
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(season.id)
        .bind(&season.name)
        .bind(season.year)
        .bind(season.start_date)
        .bind(season.end_date)
        .bind(season.updated_at)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Season not found".to_string()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM seasons WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                map_constraint_error(
                    e,
                    None,
                    Some(ForeignKeyContext::Delete("Season still has crops")),
                )
            })?;
        Ok(result.rows_affected() > 0)
    }
}
