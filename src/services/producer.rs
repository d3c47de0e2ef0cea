//! Producer registry: CRUD with document normalization and uniqueness.

use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::models::producer::{CreateProducer, Producer, UpdateProducer};
use crate::repositories::{FarmRepository, ProducerRepository};

#[derive(Clone)]
pub struct ProducerService {
    producers: Arc<dyn ProducerRepository>,
    farms: Arc<dyn FarmRepository>,
}

impl ProducerService {
    pub fn new(producers: Arc<dyn ProducerRepository>, farms: Arc<dyn FarmRepository>) -> Self {
        Self { producers, farms }
    }

    /// Register a producer. The document is reduced to digits before it is checked.
    pub async fn create(&self, input: CreateProducer) -> Result<Producer, AppError> {
        let input = input.normalized();
        input.validate()?;

        if self
            .producers
            .find_by_document(&input.document)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict("Document already registered".to_string()));
        }

        let producer = self.producers.create(Producer::new(input)).await?;
        tracing::info!(producer_id = %producer.id, "Created producer");
        Ok(producer)
    }

    pub async fn list(&self) -> Result<Vec<Producer>, AppError> {
        self.producers.find_all().await
    }

    pub async fn get(&self, id: Uuid) -> Result<Producer, AppError> {
        self.producers
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Producer not found".to_string()))
    }

    pub async fn update(&self, id: Uuid, input: UpdateProducer) -> Result<Producer, AppError> {
        let input = input.normalized();
        input.validate()?;

        let mut producer = self.get(id).await?;
        if let Some(document) = input.document.as_deref() {
            if let Some(other) = self.producers.find_by_document(document).await? {
                if other.id != id {
                    return Err(AppError::Conflict("Document already registered".to_string()));
                }
            }
        }

        producer.apply_update(input);
        self.producers.update(producer).await
    }

    /// Remove a producer that no longer owns any farm.
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.get(id).await?;
        if self.farms.count_by_producer(id).await? > 0 {
            return Err(AppError::Conflict("Producer still owns farms".to_string()));
        }
        if !self.producers.delete(id).await? {
            return Err(AppError::NotFound("Producer not found".to_string()));
        }
        tracing::info!(producer_id = %id, "Deleted producer");
        Ok(())
    }
}
