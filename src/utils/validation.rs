//! Validation helpers
//!
//! Custom validators used by the `validator` derives on request bodies, plus
//! small parsing helpers for query parameters.

use lazy_static::lazy_static;
use regex::Regex;
use uuid::Uuid;
use validator::ValidationError;

use crate::utils::errors::AppError;

lazy_static! {
    static ref TRUCK_NUMBER_RE: Regex = Regex::new(r"^[A-Za-z0-9][A-Za-z0-9-]{0,19}$").unwrap();
    static ref SKU_RE: Regex = Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.-]{0,39}$").unwrap();
    static ref BIN_CODE_RE: Regex = Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]{0,19}$").unwrap();
}

/// Phone numbers: digits with optional separators, 10 to 15 digits
pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    let digits = value.chars().filter(|c| c.is_ascii_digit()).count();
    let allowed = value
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '(' | ')' | '+' | '.'));

    if !allowed || !(10..=15).contains(&digits) {
        let mut error = ValidationError::new("phone");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

pub fn validate_truck_number(value: &str) -> Result<(), ValidationError> {
    if !TRUCK_NUMBER_RE.is_match(value) {
        let mut error = ValidationError::new("truck_number");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

pub fn validate_sku(value: &str) -> Result<(), ValidationError> {
    if !SKU_RE.is_match(value) {
        let mut error = ValidationError::new("sku");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

pub fn validate_bin_code(value: &str) -> Result<(), ValidationError> {
    if !BIN_CODE_RE.is_match(value) {
        let mut error = ValidationError::new("bin_code");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Reject blank strings
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("not_blank"));
    }
    Ok(())
}

/// Parse a UUID coming from a query string
pub fn parse_uuid_param(name: &str, value: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(value.trim())
        .map_err(|_| AppError::BadRequest(format!("{} must be a valid UUID", name)))
}

/// Build a `%term%` pattern for ILIKE searches, escaping wildcards
pub fn like_pattern(term: &str) -> String {
    let escaped = term
        .trim()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_numbers() {
        assert!(validate_phone("(555) 123-4567").is_ok());
        assert!(validate_phone("+1 555 123 4567").is_ok());
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("555-CALL-NOW1").is_err());
    }

    #[test]
    fn truck_numbers_and_skus() {
        assert!(validate_truck_number("T-101").is_ok());
        assert!(validate_truck_number("-T1").is_err());
        assert!(validate_truck_number("truck 1").is_err());
        assert!(validate_sku("INV-42").is_ok());
        assert!(validate_sku("").is_err());
        assert!(validate_bin_code("B1").is_ok());
    }

    #[test]
    fn uuid_params() {
        let id = Uuid::new_v4();
        assert_eq!(parse_uuid_param("itemId", &id.to_string()).unwrap(), id);
        assert!(matches!(parse_uuid_param("itemId", "INV-42"), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn like_patterns_escape_wildcards() {
        assert_eq!(like_pattern(" filter "), "%filter%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }
}
