//! Harvest season registry.

use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::models::season::{CreateSeason, Season, UpdateSeason};
use crate::repositories::{CropRepository, SeasonRepository};

#[derive(Clone)]
pub struct SeasonService {
    seasons: Arc<dyn SeasonRepository>,
    crops: Arc<dyn CropRepository>,
}

impl SeasonService {
    pub fn new(seasons: Arc<dyn SeasonRepository>, crops: Arc<dyn CropRepository>) -> Self {
        Self { seasons, crops }
    }

    pub async fn create(&self, input: CreateSeason) -> Result<Season, AppError> {
        input.validate()?;
        let season = self.seasons.create(Season::new(input)).await?;
        tracing::info!(season_id = %season.id, year = season.year, "Created season");
        Ok(season)
    }

    pub async fn list(&self) -> Result<Vec<Season>, AppError> {
        self.seasons.find_all().await
    }

    pub async fn get(&self, id: Uuid) -> Result<Season, AppError> {
        self.seasons
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Season not found".to_string()))
    }

    pub async fn update(&self, id: Uuid, input: UpdateSeason) -> Result<Season, AppError> {
        input.validate()?;
        let mut season = self.get(id).await?;
        season.apply_update(input);
        season.check_dates()?;
        self.seasons.update(season).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.get(id).await?;
        if self.crops.count_by_season(id).await? > 0 {
            return Err(AppError::Conflict("Season still has crops".to_string()));
        }
        if !self.seasons.delete(id).await? {
            return Err(AppError::NotFound("Season not found".to_string()));
        }
        tracing::info!(season_id = %id, "Deleted season");
        Ok(())
    }
}
