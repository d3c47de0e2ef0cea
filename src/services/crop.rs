//! Crop registry: one name per farm and season.

use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::models::crop::{CreateCrop, Crop, UpdateCrop};
use crate::repositories::crop::DUPLICATE_CROP;
use crate::repositories::{CropRepository, FarmRepository, SeasonRepository};

#[derive(Clone)]
pub struct CropService {
    crops: Arc<dyn CropRepository>,
    farms: Arc<dyn FarmRepository>,
    seasons: Arc<dyn SeasonRepository>,
}

impl CropService {
    pub fn new(
        crops: Arc<dyn CropRepository>,
        farms: Arc<dyn FarmRepository>,
        seasons: Arc<dyn SeasonRepository>,
    ) -> Self {
        Self {
            crops,
            farms,
            seasons,
        }
    }

    /// The referenced farm and season must exist and the name must be free there.
    async fn check_placement(
        &self,
        crop: &Crop,
        exclude_id: Option<Uuid>,
    ) -> Result<(), AppError> {
        if self.seasons.find_by_id(crop.season_id).await?.is_none() {
            return Err(AppError::Validation(
                "Referenced season does not exist".to_string(),
            ));
        }
        if self.farms.find_by_id(crop.farm_id).await?.is_none() {
            return Err(AppError::Validation(
                "Referenced farm does not exist".to_string(),
            ));
        }
        if self
            .crops
            .exists_by_name(crop.farm_id, crop.season_id, &crop.name, exclude_id)
            .await?
        {
            return Err(AppError::Conflict(DUPLICATE_CROP.to_string()));
        }
        Ok(())
    }

    pub async fn create(&self, input: CreateCrop) -> Result<Crop, AppError> {
        input.validate()?;
        let crop = Crop::new(input);
        self.check_placement(&crop, None).await?;

        let crop = self.crops.create(crop).await?;
        tracing::info!(crop_id = %crop.id, farm_id = %crop.farm_id, "Created crop");
        Ok(crop)
    }

    pub async fn list(&self) -> Result<Vec<Crop>, AppError> {
        self.crops.find_all().await
    }

    pub async fn get(&self, id: Uuid) -> Result<Crop, AppError> {
        self.crops
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Crop not found".to_string()))
    }

    pub async fn update(&self, id: Uuid, input: UpdateCrop) -> Result<Crop, AppError> {
        input.validate()?;
        let mut crop = self.get(id).await?;
        crop.apply_update(input);
        self.check_placement(&crop, Some(id)).await?;
        self.crops.update(crop).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.crops.delete(id).await? {
            return Err(AppError::NotFound("Crop not found".to_string()));
        }
        tracing::info!(crop_id = %id, "Deleted crop");
        Ok(())
    }
}
