//! Domain entities, DTOs and dashboard value objects.

pub mod crop;
pub mod dashboard;
pub mod farm;
pub mod producer;
pub mod season;
pub mod validation;
