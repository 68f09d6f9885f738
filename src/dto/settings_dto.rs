use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Settings grouped by category, every value as its stored string
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsDocument {
    #[serde(default)]
    pub platform: BTreeMap<String, String>,
    #[serde(default)]
    pub commission: BTreeMap<String, String>,
    #[serde(default)]
    pub security: BTreeMap<String, String>,
}

/// Incoming settings; values may be any JSON scalar and are normalized to
/// strings before they are stored
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsImportRequest {
    #[serde(default)]
    pub platform: BTreeMap<String, Value>,
    #[serde(default)]
    pub commission: BTreeMap<String, Value>,
    #[serde(default)]
    pub security: BTreeMap<String, Value>,
}
