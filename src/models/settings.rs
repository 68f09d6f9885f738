//! Key-value platform settings

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

text_enum! {
    /// Settings groups used by the admin screens and the export document
    pub enum SettingCategory {
        Platform => "platform",
        Commission => "commission",
        Security => "security",
    }
}

/// Row of the `settings` table
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Setting {
    pub key: String,
    pub value: String,
    pub category: String,
    pub updated_at: DateTime<Utc>,
}
