use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::utils::validation::validate_sku;

// Request to add a catalog item
#[derive(Debug, Deserialize, Validate)]
pub struct CreateInventoryItemRequest {
    #[validate(custom = "validate_sku")]
    pub sku: String,

    #[validate(length(min = 2, max = 150))]
    pub name: String,

    #[validate(length(min = 2, max = 50))]
    pub category: String,

    #[validate(length(min = 1, max = 20))]
    pub unit: Option<String>,

    #[validate(range(min = 0))]
    pub standard_quantity: Option<i32>,

    #[validate(range(min = 0))]
    pub min_quantity: Option<i32>,

    pub unit_price: Decimal,
}

// Request to update a catalog item
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateInventoryItemRequest {
    #[validate(custom = "validate_sku")]
    pub sku: Option<String>,

    #[validate(length(min = 2, max = 150))]
    pub name: Option<String>,

    #[validate(length(min = 2, max = 50))]
    pub category: Option<String>,

    #[validate(length(min = 1, max = 20))]
    pub unit: Option<String>,

    #[validate(range(min = 0))]
    pub standard_quantity: Option<i32>,

    #[validate(range(min = 0))]
    pub min_quantity: Option<i32>,

    pub unit_price: Option<Decimal>,
}

impl CreateInventoryItemRequest {
    pub fn has_valid_price(&self) -> bool {
        !self.unit_price.is_sign_negative()
    }
}

impl UpdateInventoryItemRequest {
    pub fn has_valid_price(&self) -> bool {
        self.unit_price.map_or(true, |price| !price.is_sign_negative())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct InventoryItemFilters {
    pub search: Option<String>,
    pub category: Option<String>,
}
