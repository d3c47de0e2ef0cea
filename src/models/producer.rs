//! Rural producer, identified by a CPF or CNPJ tax document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::validation::{normalize_document, validate_document, validate_not_blank};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Producer {
    pub id: Uuid,
    pub name: String,
    /// Digits only.
    pub document: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProducer {
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,
    #[validate(custom(function = "validate_document"))]
    pub document: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProducer {
    #[validate(custom(function = "validate_not_blank"))]
    pub name: Option<String>,
    #[validate(custom(function = "validate_document"))]
    pub document: Option<String>,
}

impl CreateProducer {
    /// Reduce the document to its digits before validation.
    pub fn normalized(mut self) -> Self {
        self.document = normalize_document(&self.document);
        self
    }
}

impl UpdateProducer {
    pub fn normalized(mut self) -> Self {
        self.document = self.document.as_deref().map(normalize_document);
        self
    }
}

impl Producer {
    pub fn new(input: CreateProducer) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: input.name,
            document: input.document,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(&mut self, input: UpdateProducer) {
        if let Some(name) = input.name {
            self.name = name;
        }
        if let Some(document) = input.document {
            self.document = document;
        }
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formatted_document_passes_after_normalization() {
        let input = CreateProducer {
            name: "José Silva".to_string(),
            document: "123.456.789-01".to_string(),
        };
        assert!(input.validate().is_err());

        let input = input.normalized();
        assert_eq!(input.document, "12345678901");
        assert!(input.validate().is_ok());
    }

    #[test]
    fn empty_name_is_rejected() {
        let input = CreateProducer {
            name: "".to_string(),
            document: "12345678901".to_string(),
        };
        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
    }

    #[test]
    fn update_with_no_fields_is_valid() {
        assert!(UpdateProducer::default().normalized().validate().is_ok());
    }

    #[test]
    fn serializes_camel_case() {
        let producer = Producer::new(CreateProducer {
            name: "Maria Oliveira".to_string(),
            document: "23456789012".to_string(),
        });
        let json = serde_json::to_value(&producer).unwrap();
        assert_eq!(json["name"], "Maria Oliveira");
        assert!(json.get("createdAt").is_some());
    }
}
