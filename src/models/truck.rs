//! Truck model

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

text_enum! {
    /// Truck state - maps the `trucks.status` column
    pub enum TruckStatus {
        Active => "active",
        Maintenance => "maintenance",
        Inactive => "inactive",
    }
}

/// Row of the `trucks` table
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Truck {
    pub id: Uuid,
    pub truck_number: String,
    pub status: String,
    pub assigned_to: Option<Uuid>,
    pub license_plate: Option<String>,
    pub mileage: i32,
    pub last_maintenance_date: Option<NaiveDate>,
    pub next_maintenance_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Truck joined with its assignee and bin count, for listings
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TruckOverview {
    pub id: Uuid,
    pub truck_number: String,
    pub status: String,
    pub assigned_to: Option<Uuid>,
    pub assigned_to_name: Option<String>,
    pub license_plate: Option<String>,
    pub mileage: i32,
    pub last_maintenance_date: Option<NaiveDate>,
    pub next_maintenance_date: Option<NaiveDate>,
    pub bin_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
