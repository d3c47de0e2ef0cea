//! Farm: a land parcel owned by a producer, with its area breakdown in hectares.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::validation::{area_sum_error, area_sum_within_total, validate_not_blank};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Farm {
    pub id: Uuid,
    pub producer_id: Uuid,
    pub name: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub total_area: f64,
    pub arable_area: f64,
    pub vegetation_area: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_create_area_sum"))]
pub struct CreateFarm {
    pub producer_id: Uuid,
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub city: Option<String>,
    #[validate(custom(function = "validate_not_blank"))]
    pub state: Option<String>,
    #[validate(range(exclusive_min = 0.0, message = "must be a positive number"))]
    pub total_area: f64,
    #[validate(range(exclusive_min = 0.0, message = "must be a positive number"))]
    pub arable_area: f64,
    #[validate(range(exclusive_min = 0.0, message = "must be a positive number"))]
    pub vegetation_area: f64,
}

/// Partial update. The area sum is checked on the merged record by the service.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFarm {
    pub producer_id: Option<Uuid>,
    #[validate(custom(function = "validate_not_blank"))]
    pub name: Option<String>,
    #[validate(custom(function = "validate_not_blank"))]
    pub city: Option<String>,
    #[validate(custom(function = "validate_not_blank"))]
    pub state: Option<String>,
    #[validate(range(exclusive_min = 0.0, message = "must be a positive number"))]
    pub total_area: Option<f64>,
    #[validate(range(exclusive_min = 0.0, message = "must be a positive number"))]
    pub arable_area: Option<f64>,
    #[validate(range(exclusive_min = 0.0, message = "must be a positive number"))]
    pub vegetation_area: Option<f64>,
}

fn validate_create_area_sum(input: &CreateFarm) -> Result<(), ValidationError> {
    if !area_sum_within_total(input.total_area, input.arable_area, input.vegetation_area) {
        return Err(area_sum_error());
    }
    Ok(())
}

impl Farm {
    pub fn new(input: CreateFarm) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            producer_id: input.producer_id,
            name: input.name,
            city: input.city,
            state: input.state,
            total_area: input.total_area,
            arable_area: input.arable_area,
            vegetation_area: input.vegetation_area,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(&mut self, input: UpdateFarm) {
        if let Some(producer_id) = input.producer_id {
            self.producer_id = producer_id;
        }
        if let Some(name) = input.name {
            self.name = name;
        }
        if input.city.is_some() {
            self.city = input.city;
        }
        if input.state.is_some() {
            self.state = input.state;
        }
        if let Some(total) = input.total_area {
            self.total_area = total;
        }
        if let Some(arable) = input.arable_area {
            self.arable_area = arable;
        }
        if let Some(vegetation) = input.vegetation_area {
            self.vegetation_area = vegetation;
        }
        self.updated_at = Utc::now();
    }

    /// Cross-field check run after a partial update has been merged.
    pub fn check_area_sum(&self) -> Result<(), ValidationError> {
        if !area_sum_within_total(self.total_area, self.arable_area, self.vegetation_area) {
            return Err(area_sum_error());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(total: f64, arable: f64, vegetation: f64) -> CreateFarm {
        CreateFarm {
            producer_id: Uuid::new_v4(),
            name: "Fazenda Boa Vista".to_string(),
            city: Some("Campina Grande".to_string()),
            state: Some("PB".to_string()),
            total_area: total,
            arable_area: arable,
            vegetation_area: vegetation,
        }
    }

    #[test]
    fn valid_farm_passes() {
        assert!(create(200.0, 140.0, 60.0).validate().is_ok());
    }

    #[test]
    fn area_sum_exceeding_total_is_rejected() {
        let errors = create(100.0, 70.0, 40.0).validate().unwrap_err();
        assert!(errors.errors().contains_key("__all__"));
    }

    #[test]
    fn non_positive_area_is_rejected() {
        let errors = create(0.0, 10.0, 10.0).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("total_area"));
    }

    #[test]
    fn blank_state_is_rejected_but_absent_state_is_fine() {
        let mut input = create(100.0, 50.0, 50.0);
        input.state = Some(" ".to_string());
        assert!(input.validate().is_err());

        input.state = None;
        assert!(input.validate().is_ok());
    }

    #[test]
    fn apply_update_merges_only_given_fields() {
        let mut farm = Farm::new(create(200.0, 140.0, 60.0));
        farm.apply_update(UpdateFarm {
            name: Some("Fazenda Nova".to_string()),
            total_area: Some(150.0),
            ..Default::default()
        });
        assert_eq!(farm.name, "Fazenda Nova");
        assert_eq!(farm.total_area, 150.0);
        assert_eq!(farm.state.as_deref(), Some("PB"));
        assert!(farm.check_area_sum().is_err());
    }
}
