//! Harvest season ("safra"): a named interval under which crops are recorded.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::validation::validate_not_blank;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Season {
    pub id: Uuid,
    pub name: String,
    /// Calendar year of `start_date`.
    pub year: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_create_dates"))]
pub struct CreateSeason {
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSeason {
    #[validate(custom(function = "validate_not_blank"))]
    pub name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

fn date_order_error() -> ValidationError {
    let mut err = ValidationError::new("date_order");
    err.message = Some("endDate must not precede startDate".into());
    err
}

fn validate_create_dates(input: &CreateSeason) -> Result<(), ValidationError> {
    if input.end_date < input.start_date {
        return Err(date_order_error());
    }
    Ok(())
}

impl Season {
    pub fn new(input: CreateSeason) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: input.name,
            year: input.start_date.year(),
            start_date: input.start_date,
            end_date: input.end_date,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(&mut self, input: UpdateSeason) {
        if let Some(name) = input.name {
            self.name = name;
        }
        if let Some(start) = input.start_date {
            self.start_date = start;
            self.year = start.year();
        }
        if let Some(end) = input.end_date {
            self.end_date = end;
        }
        self.updated_at = Utc::now();
    }

    pub fn check_dates(&self) -> Result<(), ValidationError> {
        if self.end_date < self.start_date {
            return Err(date_order_error());
        }
        Ok(())
    }
}
