use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::{map_constraint_error, AppError, ForeignKeyContext};
use crate::models::producer::Producer;

const DUPLICATE_DOCUMENT: &str = "Document already registered";

/// Persistence for producers.
#[async_trait]
pub trait ProducerRepository: Send + Sync {
    async fn create(&self, producer: Producer) -> Result<Producer, AppError>;

    /// All producers ordered by name.
    async fn find_all(&self) -> Result<Vec<Producer>, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Producer>, AppError>;

    async fn find_by_document(&self, document: &str) -> Result<Option<Producer>, AppError>;

    /// Persist a merged record. `NotFound` if the id is unknown.
    async fn update(&self, producer: Producer) -> Result<Producer, AppError>;

    /// Returns `false` if nothing was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

/// In-memory implementation (for development/testing).
#[derive(Debug, Default, Clone)]
pub struct InMemoryProducerRepository {
    producers: Arc<RwLock<HashMap<Uuid, Producer>>>,
}

impl InMemoryProducerRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProducerRepository for InMemoryProducerRepository {
    async fn create(&self, producer: Producer) -> Result<Producer, AppError> {
        let mut producers = self.producers.write().await;
        if producers.values().any(|p| p.document == producer.document) {
            return Err(AppError::Conflict(DUPLICATE_DOCUMENT.to_string()));
        }
        producers.insert(producer.id, producer.clone());
        Ok(producer)
    }

    async fn find_all(&self) -> Result<Vec<Producer>, AppError> {
        let producers = self.producers.read().await;
        let mut result: Vec<Producer> = producers.values().cloned().collect();
        result.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(result)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Producer>, AppError> {
        Ok(self.producers.read().await.get(&id).cloned())
    }

    async fn find_by_document(&self, document: &str) -> Result<Option<Producer>, AppError> {
        let producers = self.producers.read().await;
        Ok(producers.values().find(|p| p.document == document).cloned())
    }

    async fn update(&self, producer: Producer) -> Result<Producer, AppError> {
        let mut producers = self.producers.write().await;
        if producers
            .values()
            .any(|p| p.id != producer.id && p.document == producer.document)
        {
            return Err(AppError::Conflict(DUPLICATE_DOCUMENT.to_string()));
        }
        let slot = producers
            .get_mut(&producer.id)
            .ok_or_else(|| AppError::NotFound("Producer not found".to_string()))?;
        *slot = producer.clone();
        Ok(producer)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.producers.write().await.remove(&id).is_some())
    }
}

/// PostgreSQL implementation.
#[derive(Debug, Clone)]
pub struct PgProducerRepository {
    pool: PgPool,
}

impl PgProducerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProducerRepository for PgProducerRepository {
    async fn create(&self, producer: Producer) -> Result<Producer, AppError> {
        sqlx::query_as::<_, Producer>(
            r#"
            INSERT INTO producers (id, name, document, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(producer.id)
        .bind(&producer.name)
        .bind(&producer.document)
        .bind(producer.created_at)
        .bind(producer.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_constraint_error(e, Some(DUPLICATE_DOCUMENT), None))
    }

    async fn find_all(&self) -> Result<Vec<Producer>, AppError> {
        let rows = sqlx::query_as::<_, Producer>("SELECT * FROM producers ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Producer>, AppError> {
        let row = sqlx::query_as::<_, Producer>("SELECT * FROM producers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_document(&self, document: &str) -> Result<Option<Producer>, AppError> {
        let row = sqlx::query_as::<_, Producer>("SELECT * FROM producers WHERE document = $1")
            .bind(document)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update(&self, producer: Producer) -> Result<Producer, AppError> {
        sqlx::query_as::<_, Producer>(
            r#"
            UPDATE producers SET
                name = $2,
                document = $3,
                updated_at = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(producer.id)
        .bind(&producer.name)
        .bind(&producer.document)
        .bind(producer.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_constraint_error(e, Some(DUPLICATE_DOCUMENT), None))?
        .ok_or_else(|| AppError::NotFound("Producer not found".to_string()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM producers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                map_constraint_error(
                    e,
                    None,
                    Some(ForeignKeyContext::Delete("Producer still owns farms")),
                )
            })?;
        Ok(result.rows_affected() > 0)
    }
}
