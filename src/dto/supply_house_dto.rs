use serde::Deserialize;
use validator::Validate;

use crate::utils::validation::validate_phone;

// Request to create a supply house
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSupplyHouseRequest {
    #[validate(length(min = 2, max = 150))]
    pub name: String,

    #[validate(length(max = 100))]
    pub contact_name: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(custom = "validate_phone")]
    pub phone: Option<String>,

    #[validate(length(max = 300))]
    pub address: Option<String>,

    #[serde(default)]
    pub specialties: Vec<String>,
}

// Request to update a supply house
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateSupplyHouseRequest {
    #[validate(length(min = 2, max = 150))]
    pub name: Option<String>,

    #[validate(length(max = 100))]
    pub contact_name: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(custom = "validate_phone")]
    pub phone: Option<String>,

    #[validate(length(max = 300))]
    pub address: Option<String>,

    pub specialties: Option<Vec<String>>,

    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SupplyHouseFilters {
    pub search: Option<String>,
    pub include_inactive: Option<bool>,
}
