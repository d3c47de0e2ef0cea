//! Dashboard filter and metrics report.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::farm::Farm;
use super::validation::validate_area_bound;

/// Optional constraints narrowing the farm population of a metrics report.
///
/// Accepted from the query string; `estado` and `cultura` are accepted as
/// aliases of `state` and `crop`. Serialized back unchanged as the report's
/// `filtrosAplicados`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DashboardFilter {
    /// Case-insensitive substring of farm name, city or state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, alias = "estado", skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, alias = "cultura", skip_serializing_if = "Option::is_none")]
    pub crop: Option<String>,
    #[validate(custom(function = "validate_area_bound"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_min: Option<f64>,
    #[validate(custom(function = "validate_area_bound"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_max: Option<f64>,
}

impl DashboardFilter {
    /// Search text, when present and not blank.
    pub fn search_text(&self) -> Option<&str> {
        active(&self.search)
    }

    pub fn state_code(&self) -> Option<&str> {
        active(&self.state)
    }

    pub fn crop_name(&self) -> Option<&str> {
        active(&self.crop)
    }

    /// Whether a farm with the given crop names belongs to the qualifying population.
    pub fn matches<'a, I>(&self, farm: &Farm, crop_names: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        if let Some(state) = self.state_code() {
            if farm.state.as_deref() != Some(state) {
                return false;
            }
        }
        if let Some(min) = self.area_min {
            if farm.total_area < min {
                return false;
            }
        }
        if let Some(max) = self.area_max {
            if farm.total_area > max {
                return false;
            }
        }
        if let Some(search) = self.search_text() {
            let needle = search.to_lowercase();
            let hit = |field: Option<&str>| {
                field.is_some_and(|value| value.to_lowercase().contains(&needle))
            };
            if !(hit(Some(farm.name.as_str()))
                || hit(farm.city.as_deref())
                || hit(farm.state.as_deref()))
            {
                return false;
            }
        }
        if let Some(crop) = self.crop_name() {
            if !crop_names.into_iter().any(|name| name == crop) {
                return false;
            }
        }
        true
    }
}

fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Summed arable and vegetation area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct LandUse {
    #[serde(rename = "agricultavel")]
    pub arable: f64,
    #[serde(rename = "vegetacao")]
    pub vegetation: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Charts {
    /// Qualifying farms per state code.
    #[serde(rename = "porEstado")]
    pub by_state: BTreeMap<String, i64>,
    /// Crop associations of qualifying farms per crop name.
    #[serde(rename = "porCultura")]
    pub by_crop: BTreeMap<String, i64>,
    #[serde(rename = "porUsoDoSolo")]
    pub by_land_use: LandUse,
}

/// Aggregate metrics over one qualifying farm population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsReport {
    pub total_farms: i64,
    pub total_hectares: f64,
    #[serde(rename = "graficos")]
    pub charts: Charts,
    #[serde(rename = "filtrosAplicados")]
    pub applied_filters: DashboardFilter,
}
