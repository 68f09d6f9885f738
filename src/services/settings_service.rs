//! Settings normalization and typed access
//!
//! Every setting is stored as text. Imports accept any JSON scalar and store
//! its canonical string: booleans become `"true"`/`"false"`, numbers their
//! decimal form, and both `null` and the string `"null"` the empty string.

use std::collections::BTreeMap;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::dto::settings_dto::{SettingsDocument, SettingsImportRequest};
use crate::models::settings::{Setting, SettingCategory};
use crate::repositories::settings_repository::SettingEntry;
use crate::utils::errors::AppError;

lazy_static! {
    static ref SETTING_KEY_RE: Regex = Regex::new(r"^[a-z][a-z0-9_]{0,63}$").unwrap();
}

pub const COMMISSION_RATE: &str = "commission_rate";
pub const TECHNICIAN_CREDIT_RATE: &str = "technician_credit_rate";
pub const MINIMUM_REDEMPTION: &str = "minimum_redemption";

/// Canonical stored form of an imported value
pub fn normalize_value(value: &Value) -> Result<String, AppError> {
    match value {
        Value::Null => Ok(String::new()),
        Value::Bool(flag) => Ok(flag.to_string()),
        Value::Number(number) => Ok(number.to_string()),
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.eq_ignore_ascii_case("null") {
                Ok(String::new())
            } else {
                Ok(trimmed.to_string())
            }
        }
        Value::Array(_) | Value::Object(_) => Err(AppError::BadRequest(
            "Setting values must be strings, numbers, booleans or null".to_string(),
        )),
    }
}

/// Read-side view over a stored setting string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingValue<'a>(pub &'a str);

impl<'a> SettingValue<'a> {
    pub fn as_bool(&self) -> bool {
        matches!(
            self.0.trim().to_ascii_lowercase().as_str(),
            "true" | "1" | "yes" | "on"
        )
    }

    pub fn as_decimal(&self) -> Option<Decimal> {
        Decimal::from_str(self.0.trim()).ok()
    }

    /// `None` for the empty string
    pub fn as_opt_str(&self) -> Option<&'a str> {
        let trimmed = self.0.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    }
}

/// Groups stored rows by category
pub fn document_from_rows(rows: &[Setting]) -> SettingsDocument {
    let mut document = SettingsDocument::default();

    for row in rows {
        let section = match SettingCategory::from_str(&row.category) {
            Some(SettingCategory::Platform) => &mut document.platform,
            Some(SettingCategory::Commission) => &mut document.commission,
            Some(SettingCategory::Security) => &mut document.security,
            None => {
                tracing::warn!(key = %row.key, category = %row.category, "skipping setting with unknown category");
                continue;
            }
        };
        section.insert(row.key.clone(), row.value.clone());
    }

    document
}

/// Validates keys and normalizes values of an import
pub fn entries_from_import(request: &SettingsImportRequest) -> Result<Vec<SettingEntry>, AppError> {
    let sections: [(SettingCategory, &BTreeMap<String, Value>); 3] = [
        (SettingCategory::Platform, &request.platform),
        (SettingCategory::Commission, &request.commission),
        (SettingCategory::Security, &request.security),
    ];

    let mut entries = Vec::new();
    for (category, values) in sections {
        for (key, value) in values {
            if !SETTING_KEY_RE.is_match(key) {
                return Err(AppError::BadRequest(format!("Invalid setting key '{}'", key)));
            }
            let value = normalize_value(value)
                .map_err(|_| AppError::BadRequest(format!("Invalid value for setting '{}'", key)))?;
            entries.push(SettingEntry {
                key: key.clone(),
                value,
                category,
            });
        }
    }

    // A key belongs to one category only
    let mut seen = std::collections::HashSet::new();
    for entry in &entries {
        if !seen.insert(entry.key.as_str()) {
            return Err(AppError::BadRequest(format!(
                "Setting '{}' appears in more than one category",
                entry.key
            )));
        }
    }

    Ok(entries)
}

/// Commission settings with their defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommissionRates {
    /// Percent of the order total kept as platform commission
    pub commission_rate: Decimal,
    /// Percent of the order total credited to the technician
    pub technician_credit_rate: Decimal,
    pub minimum_redemption: Decimal,
}

impl Default for CommissionRates {
    fn default() -> Self {
        Self {
            commission_rate: Decimal::from(10),
            technician_credit_rate: Decimal::from(5),
            minimum_redemption: Decimal::from(25),
        }
    }
}

impl CommissionRates {
    pub fn from_document(document: &SettingsDocument) -> Self {
        let defaults = Self::default();
        let read = |key: &str, fallback: Decimal, max: Option<Decimal>| -> Decimal {
            let parsed = document
                .commission
                .get(key)
                .and_then(|raw| SettingValue(raw).as_decimal())
                .filter(|value| !value.is_sign_negative() && max.map_or(true, |max| *value <= max));

            match parsed {
                Some(value) => value,
                None => {
                    if document.commission.contains_key(key) {
                        tracing::warn!(key, "invalid commission setting, using default {}", fallback);
                    }
                    fallback
                }
            }
        };

        let hundred = Some(Decimal::ONE_HUNDRED);
        Self {
            commission_rate: read(COMMISSION_RATE, defaults.commission_rate, hundred),
            technician_credit_rate: read(TECHNICIAN_CREDIT_RATE, defaults.technician_credit_rate, hundred),
            minimum_redemption: read(MINIMUM_REDEMPTION, defaults.minimum_redemption, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn row(key: &str, value: &str, category: &str) -> Setting {
        Setting {
            key: key.into(),
            value: value.into(),
            category: category.into(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn sentinels_are_normalized() {
        assert_eq!(normalize_value(&json!(null)).unwrap(), "");
        assert_eq!(normalize_value(&json!("null")).unwrap(), "");
        assert_eq!(normalize_value(&json!(true)).unwrap(), "true");
        assert_eq!(normalize_value(&json!(false)).unwrap(), "false");
        assert_eq!(normalize_value(&json!(12.5)).unwrap(), "12.5");
        assert_eq!(normalize_value(&json!(" TruXtoK ")).unwrap(), "TruXtoK");
        assert!(normalize_value(&json!([1, 2])).is_err());
        assert!(normalize_value(&json!({ "a": 1 })).is_err());
    }

    #[test]
    fn typed_readers() {
        assert!(SettingValue("true").as_bool());
        assert!(SettingValue("ON").as_bool());
        assert!(!SettingValue("false").as_bool());
        assert!(!SettingValue("").as_bool());
        assert_eq!(SettingValue(" 7.5 ").as_decimal(), Some(dec!(7.5)));
        assert_eq!(SettingValue("ten").as_decimal(), None);
        assert_eq!(SettingValue("").as_opt_str(), None);
        assert_eq!(SettingValue("ops@truxtok.com").as_opt_str(), Some("ops@truxtok.com"));
    }

    #[test]
    fn export_then_import_round_trips() {
        let rows = vec![
            row("platform_name", "TruXtoK", "platform"),
            row("maintenance_mode", "false", "platform"),
            row("commission_rate", "10", "commission"),
            row("session_timeout_minutes", "1440", "security"),
            row("legacy", "x", "billing"),
        ];
        let exported = document_from_rows(&rows);
        assert_eq!(exported.platform.len(), 2);
        assert!(!exported.platform.contains_key("legacy"));

        let import: SettingsImportRequest =
            serde_json::from_value(serde_json::to_value(&exported).unwrap()).unwrap();
        let entries = entries_from_import(&import).unwrap();

        let stored: Vec<Setting> = entries
            .iter()
            .map(|entry| row(&entry.key, &entry.value, entry.category.as_str()))
            .collect();
        assert_eq!(document_from_rows(&stored), exported);
    }

    #[test]
    fn import_rejects_bad_keys_and_duplicates() {
        let bad_key: SettingsImportRequest =
            serde_json::from_value(json!({ "platform": { "Bad Key": "x" } })).unwrap();
        assert!(entries_from_import(&bad_key).is_err());

        let duplicate: SettingsImportRequest = serde_json::from_value(json!({
            "platform": { "commission_rate": 1 },
            "commission": { "commission_rate": 2 }
        }))
        .unwrap();
        assert!(entries_from_import(&duplicate).is_err());
    }

    #[test]
    fn commission_rates_fall_back_to_defaults() {
        let mut document = SettingsDocument::default();
        assert_eq!(CommissionRates::from_document(&document), CommissionRates::default());

        document.commission.insert(COMMISSION_RATE.into(), "12.5".into());
        document.commission.insert(TECHNICIAN_CREDIT_RATE.into(), "-3".into());
        document.commission.insert(MINIMUM_REDEMPTION.into(), "".into());
        let rates = CommissionRates::from_document(&document);
        assert_eq!(rates.commission_rate, dec!(12.5));
        assert_eq!(rates.technician_credit_rate, dec!(5));
        assert_eq!(rates.minimum_redemption, dec!(25));
    }
}
