use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::dto::common_dto::{PageRequest, PaginationQuery};
use crate::models::truck::{TruckOverview, TruckStatus};
use crate::models::truck_bin::TruckBinOverview;
use crate::utils::validation::{validate_bin_code, validate_truck_number};

// Request to create a truck
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTruckRequest {
    #[validate(custom = "validate_truck_number")]
    pub truck_number: String,

    pub status: Option<TruckStatus>,

    pub assigned_to: Option<Uuid>,

    #[validate(length(min = 2, max = 20))]
    pub license_plate: Option<String>,

    #[validate(range(min = 0))]
    pub mileage: Option<i32>,

    pub last_maintenance_date: Option<NaiveDate>,
    pub next_maintenance_date: Option<NaiveDate>,
}

// Request to update a truck. `assigned_to: null` unassigns, absent leaves it alone.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTruckRequest {
    #[validate(custom = "validate_truck_number")]
    pub truck_number: Option<String>,

    pub status: Option<TruckStatus>,

    #[serde(default, deserialize_with = "double_option")]
    pub assigned_to: Option<Option<Uuid>>,

    #[validate(length(min = 2, max = 20))]
    pub license_plate: Option<String>,

    #[validate(range(min = 0))]
    pub mileage: Option<i32>,

    pub last_maintenance_date: Option<NaiveDate>,
    pub next_maintenance_date: Option<NaiveDate>,
}

// `POST /api/admin/trucks/:id/assign`
#[derive(Debug, Deserialize)]
pub struct AssignTruckRequest {
    #[serde(alias = "technicianId")]
    pub technician_id: Option<Uuid>,
}

// Request to add a bin to a truck
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBinRequest {
    #[validate(custom = "validate_bin_code")]
    pub bin_code: String,

    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(length(max = 100))]
    pub location: Option<String>,
}

// `GET /api/admin/trucks` filters
#[derive(Debug, Default, Deserialize)]
pub struct TruckFilters {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<TruckStatus>,
    pub search: Option<String>,
}

impl TruckFilters {
    pub fn page_request(&self) -> PageRequest {
        PaginationQuery {
            page: self.page,
            limit: self.limit,
        }
        .resolve()
    }
}

// Truck detail with its bins
#[derive(Debug, Serialize)]
pub struct TruckDetailResponse {
    #[serde(flatten)]
    pub truck: TruckOverview,
    pub bins: Vec<TruckBinOverview>,
}

/// Distinguishes a missing field from an explicit `null`
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn update_distinguishes_null_from_missing() {
        let absent: UpdateTruckRequest = serde_json::from_value(json!({ "mileage": 1200 })).unwrap();
        assert_eq!(absent.assigned_to, None);

        let cleared: UpdateTruckRequest = serde_json::from_value(json!({ "assigned_to": null })).unwrap();
        assert_eq!(cleared.assigned_to, Some(None));

        let id = Uuid::new_v4();
        let set: UpdateTruckRequest = serde_json::from_value(json!({ "assigned_to": id })).unwrap();
        assert_eq!(set.assigned_to, Some(Some(id)));
    }

    #[test]
    fn create_validation() {
        let request: CreateTruckRequest =
            serde_json::from_value(json!({ "truck_number": "T-1", "mileage": -5 })).unwrap();
        assert!(request.validate().unwrap_err().field_errors().contains_key("mileage"));
    }
}
