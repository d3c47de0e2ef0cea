//! Crop: a named planting on a farm within a season.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::validation::validate_not_blank;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Crop {
    pub id: Uuid,
    pub name: String,
    pub season_id: Uuid,
    pub farm_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCrop {
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,
    pub season_id: Uuid,
    pub farm_id: Uuid,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCrop {
    #[validate(custom(function = "validate_not_blank"))]
    pub name: Option<String>,
    pub season_id: Option<Uuid>,
    pub farm_id: Option<Uuid>,
}

impl Crop {
    pub fn new(input: CreateCrop) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: input.name,
            season_id: input.season_id,
            farm_id: input.farm_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(&mut self, input: UpdateCrop) {
        if let Some(name) = input.name {
            self.name = name;
        }
        if let Some(season_id) = input.season_id {
            self.season_id = season_id;
        }
        if let Some(farm_id) = input.farm_id {
            self.farm_id = farm_id;
        }
        self.updated_at = Utc::now();
    }

    /// Key used for the one-name-per-farm-and-season rule.
    pub fn name_key(name: &str) -> String {
        name.trim().to_lowercase()
    }
}
