//! Inventory catalog model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Row of the `inventory_items` table
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InventoryItem {
    pub id: Uuid,
    pub sku: String,
    pub name: String,
    pub category: String,
    pub unit: String,
    pub standard_quantity: i32,
    pub min_quantity: i32,
    pub unit_price: Decimal,
    pub created_at: DateTime<Utc>,
}
