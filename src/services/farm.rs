//! Farm registry: CRUD with area consistency and producer references.

use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::models::farm::{CreateFarm, Farm, UpdateFarm};
use crate::repositories::{CropRepository, FarmRepository, ProducerRepository};

#[derive(Clone)]
pub struct FarmService {
    farms: Arc<dyn FarmRepository>,
    producers: Arc<dyn ProducerRepository>,
    crops: Arc<dyn CropRepository>,
}

impl FarmService {
    pub fn new(
        farms: Arc<dyn FarmRepository>,
        producers: Arc<dyn ProducerRepository>,
        crops: Arc<dyn CropRepository>,
    ) -> Self {
        Self {
            farms,
            producers,
            crops,
        }
    }

    async fn ensure_producer(&self, producer_id: Uuid) -> Result<(), AppError> {
        if self.producers.find_by_id(producer_id).await?.is_none() {
            return Err(AppError::Validation(
                "Referenced producer does not exist".to_string(),
            ));
        }
        Ok(())
    }

    pub async fn create(&self, input: CreateFarm) -> Result<Farm, AppError> {
        input.validate()?;
        self.ensure_producer(input.producer_id).await?;

        let farm = self.farms.create(Farm::new(input)).await?;
        tracing::info!(farm_id = %farm.id, producer_id = %farm.producer_id, "Created farm");
        Ok(farm)
    }

    pub async fn list(&self) -> Result<Vec<Farm>, AppError> {
        self.farms.find_all().await
    }

    pub async fn get(&self, id: Uuid) -> Result<Farm, AppError> {
        self.farms
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Farm not found".to_string()))
    }

    /// Merge a partial update; the merged areas must still add up.
    pub async fn update(&self, id: Uuid, input: UpdateFarm) -> Result<Farm, AppError> {
        input.validate()?;

        let mut farm = self.get(id).await?;
        if let Some(producer_id) = input.producer_id {
            if producer_id != farm.producer_id {
                self.ensure_producer(producer_id).await?;
            }
        }

        farm.apply_update(input);
        farm.check_area_sum()?;
        self.farms.update(farm).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.get(id).await?;
        if self.crops.count_by_farm(id).await? > 0 {
            return Err(AppError::Conflict("Farm still has crops".to_string()));
        }
        if !self.farms.delete(id).await? {
            return Err(AppError::NotFound("Farm not found".to_string()));
        }
        tracing::info!(farm_id = %id, "Deleted farm");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FieldError;
    use crate::models::crop::{CreateCrop, Crop};
    use crate::models::producer::{CreateProducer, Producer};
    use crate::repositories::{
        InMemoryCropRepository, InMemoryFarmRepository, InMemoryProducerRepository,
    };

    struct Fixture {
        service: FarmService,
        crops: InMemoryCropRepository,
        owner: Producer,
    }

    async fn fixture() -> Fixture {
        let producers = InMemoryProducerRepository::new();
        let crops = InMemoryCropRepository::new();
        let owner = producers
            .create(Producer::new(CreateProducer {
                name: "Fernanda Lima".to_string(),
                document: "44444444444".to_string(),
            }))
            .await
            .unwrap();
        let service = FarmService::new(
            Arc::new(InMemoryFarmRepository::new()),
            Arc::new(producers),
            Arc::new(crops.clone()),
        );
        Fixture {
            service,
            crops,
            owner,
        }
    }

    fn create(producer_id: Uuid) -> CreateFarm {
        CreateFarm {
            producer_id,
            name: "Fazenda Horizonte".to_string(),
            city: Some("Mossoró".to_string()),
            state: Some("RN".to_string()),
            total_area: 150.0,
            arable_area: 90.0,
            vegetation_area: 60.0,
        }
    }

    #[tokio::test]
    async fn create_accepts_areas_that_fill_the_total() {
        let f = fixture().await;
        let farm = f.service.create(create(f.owner.id)).await.unwrap();
        assert_eq!(farm.producer_id, f.owner.id);
        assert_eq!(f.service.list().await.unwrap(), vec![farm]);
    }

    #[tokio::test]
    async fn create_rejects_area_overflow() {
        let f = fixture().await;
        let mut input = create(f.owner.id);
        input.vegetation_area = 61.0;
        let err = f.service.create(input).await.unwrap_err();
        assert!(err.is_validation());
        assert!(f.service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_rejects_unknown_producer() {
        let f = fixture().await;
        let err = f.service.create(create(Uuid::new_v4())).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn update_checks_the_merged_record() {
        let f = fixture().await;
        let farm = f.service.create(create(f.owner.id)).await.unwrap();

        let err = f
            .service
            .update(
                farm.id,
                UpdateFarm {
                    total_area: Some(100.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        let AppError::InvalidFields(fields) = err else {
            panic!("expected InvalidFields");
        };
        assert_eq!(
            fields,
            vec![FieldError {
                field: "__all__".to_string(),
                message: "the sum of arable and vegetation areas exceeds the total area of the farm"
                    .to_string(),
            }]
        );
        assert_eq!(f.service.get(farm.id).await.unwrap().total_area, 150.0);

        let updated = f
            .service
            .update(
                farm.id,
                UpdateFarm {
                    total_area: Some(200.0),
                    city: Some("Natal".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.total_area, 200.0);
        assert_eq!(updated.city.as_deref(), Some("Natal"));
    }

    #[tokio::test]
    async fn update_rejects_move_to_unknown_producer() {
        let f = fixture().await;
        let farm = f.service.create(create(f.owner.id)).await.unwrap();
        let err = f
            .service
            .update(
                farm.id,
                UpdateFarm {
                    producer_id: Some(Uuid::new_v4()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn delete_is_refused_while_crops_exist() {
        let f = fixture().await;
        let farm = f.service.create(create(f.owner.id)).await.unwrap();
        let crop = f
            .crops
            .create(Crop::new(CreateCrop {
                name: "Algodão".to_string(),
                season_id: Uuid::new_v4(),
                farm_id: farm.id,
            }))
            .await
            .unwrap();

        assert!(f.service.delete(farm.id).await.unwrap_err().is_conflict());

        f.crops.delete(crop.id).await.unwrap();
        f.service.delete(farm.id).await.unwrap();
        assert!(f.service.delete(farm.id).await.unwrap_err().is_not_found());
    }
}
