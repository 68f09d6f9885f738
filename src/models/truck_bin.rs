//! Truck bins and the inventory they hold

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Row of the `truck_bins` table
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TruckBin {
    pub id: Uuid,
    pub truck_id: Uuid,
    pub bin_code: String,
    pub name: String,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Bin with its content counters
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TruckBinOverview {
    pub id: Uuid,
    pub truck_id: Uuid,
    pub bin_code: String,
    pub name: String,
    pub location: Option<String>,
    pub item_count: i64,
    pub total_quantity: i64,
    pub created_at: DateTime<Utc>,
}

/// Row of the `truck_inventory` table, one per (truck, bin, item)
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TruckInventory {
    pub id: Uuid,
    pub truck_id: Uuid,
    pub bin_id: Uuid,
    pub item_id: Uuid,
    pub quantity: i32,
    pub min_quantity: Option<i32>,
    pub max_quantity: Option<i32>,
    pub last_restocked: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

/// Bin content row joined with the catalog entry
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BinItem {
    pub item_id: Uuid,
    pub sku: String,
    pub name: String,
    pub category: String,
    pub unit: String,
    pub quantity: i32,
    pub min_quantity: Option<i32>,
    pub max_quantity: Option<i32>,
    pub unit_price: Decimal,
    pub last_restocked: Option<DateTime<Utc>>,
}

impl BinItem {
    /// Below the minimum (bin override, falling back to the catalog minimum)
    pub fn is_low_stock(&self) -> bool {
        matches!(self.min_quantity, Some(min) if self.quantity < min)
    }

    pub fn line_value(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}
