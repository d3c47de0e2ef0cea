//! Reusable field checks shared by the DTO validators.

use std::sync::LazyLock;

use regex::Regex;
use validator::ValidationError;

/// CPF (11 digits) or CNPJ (14 digits), digits only.
static DOCUMENT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{11}$|^\d{14}$").expect("valid document regex"));

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Reject empty and whitespace-only strings.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error("blank", "must not be empty"));
    }
    Ok(())
}

/// Accept only an already-normalized CPF or CNPJ.
pub fn validate_document(document: &str) -> Result<(), ValidationError> {
    if !DOCUMENT_PATTERN.is_match(document) {
        return Err(error(
            "invalid_document",
            "document must have 11 (CPF) or 14 (CNPJ) numeric digits",
        ));
    }
    Ok(())
}

/// Strip every non-digit character ("123.456.789-01" becomes "12345678901").
pub fn normalize_document(document: &str) -> String {
    document.chars().filter(char::is_ascii_digit).collect()
}

/// Arable plus vegetation area must fit inside the total area.
pub fn area_sum_within_total(total: f64, arable: f64, vegetation: f64) -> bool {
    arable + vegetation <= total
}

/// Area filter bounds must be finite and non-negative.
pub fn validate_area_bound<T: std::borrow::Borrow<f64>>(value: T) -> Result<(), ValidationError> {
    let value = *value.borrow();
    if !value.is_finite() || value < 0.0 {
        return Err(error(
            "area_bound",
            "must be a finite number greater than or equal to 0",
        ));
    }
    Ok(())
}

pub fn area_sum_error() -> ValidationError {
    error(
        "area_sum",
        "the sum of arable and vegetation areas exceeds the total area of the farm",
    )
}
