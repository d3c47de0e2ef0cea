//! Unified error handling with consistent API error envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// A single failed field check reported back to the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Error detail in the API response envelope.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

/// JSON envelope for errors and status payloads.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Json<Self> {
        Json(Self {
            data: Some(data),
            error: None,
        })
    }
}

impl ApiResponse<()> {
    /// Wrap an error in the envelope.
    pub fn error(code: &str, message: String, details: Option<Vec<FieldError>>) -> Json<Self> {
        Json(Self {
            data: None,
            error: Some(ApiError {
                code: code.to_string(),
                message,
                details,
            }),
        })
    }
}

/// Application error type mapping to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid fields: {}", format_fields(.0))]
    InvalidFields(Vec<FieldError>),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

fn format_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|f| format!("{}: {}", f.field, f.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl AppError {
    /// Check if this error represents a not-found condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this error was caused by rejected client input.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::InvalidFields(_))
    }

    /// Check if this error represents a uniqueness or reference conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| FieldError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string()),
                })
            })
            .collect();
        // HashMap iteration order is unstable; keep responses deterministic.
        fields.sort_by(|a, b| a.field.cmp(&b.field).then(a.message.cmp(&b.message)));
        AppError::InvalidFields(fields)
    }
}

/// A struct-level check that failed on a merged record.
impl From<validator::ValidationError> for AppError {
    fn from(error: validator::ValidationError) -> Self {
        AppError::InvalidFields(vec![FieldError {
            field: "__all__".to_string(),
            message: error
                .message
                .map(|m| m.to_string())
                .unwrap_or_else(|| error.code.to_string()),
        }])
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut details = None;
        let (status, code, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg),
            AppError::InvalidFields(fields) => {
                let message = format_fields(&fields);
                details = Some(fields);
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message)
            }
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg),
            AppError::Database(e) => {
                tracing::error!(error = %e, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        (status, ApiResponse::error(code, message, details)).into_response()
    }
}

/// Translate Postgres constraint violations into domain errors.
///
/// Unique violations become `Conflict`. Foreign-key violations become
/// `Conflict` on delete (the row is still referenced) and `Validation` on
/// insert/update (the referenced row does not exist).
pub fn map_constraint_error(
    e: sqlx::Error,
    on_unique: Option<&str>,
    on_foreign_key: Option<ForeignKeyContext>,
) -> AppError {
    if let sqlx::Error::Database(ref db_err) = e {
        if db_err.is_unique_violation() {
            if let Some(msg) = on_unique {
                return AppError::Conflict(msg.to_string());
            }
        }
        if db_err.is_foreign_key_violation() {
            match on_foreign_key {
                Some(ForeignKeyContext::Write(msg)) => {
                    return AppError::Validation(msg.to_string())
                }
                Some(ForeignKeyContext::Delete(msg)) => {
                    return AppError::Conflict(msg.to_string())
                }
                None => {}
            }
        }
    }
    AppError::Database(e)
}

/// Which side of a foreign key a failing statement was on.
#[derive(Debug, Clone, Copy)]
pub enum ForeignKeyContext<'a> {
    Write(&'a str),
    Delete(&'a str),
}
