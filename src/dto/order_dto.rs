use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::dto::common_dto::{PageRequest, PaginationQuery};
use crate::models::order::{OrderItemDetail, OrderOverview, OrderStatus};

// One requested line
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderLineRequest {
    #[serde(alias = "itemId")]
    pub item_id: Uuid,

    #[serde(alias = "binId")]
    pub bin_id: Option<Uuid>,

    #[validate(range(min = 1, max = 10000))]
    pub quantity: i32,
}

// `POST /api/orders`
#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrderRequest {
    #[serde(alias = "truckId")]
    pub truck_id: Uuid,

    #[serde(alias = "supplyHouseId")]
    pub supply_house_id: Uuid,

    #[validate(length(min = 1, max = 100))]
    pub items: Vec<OrderLineRequest>,

    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

impl CreateOrderRequest {
    /// Validates the request and every line
    pub fn validate_all(&self) -> Result<(), validator::ValidationErrors> {
        self.validate()?;
        for line in &self.items {
            line.validate()?;
        }
        Ok(())
    }
}

// `PATCH /api/admin/orders/:id/status`
#[derive(Debug, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

// Order list filters
#[derive(Debug, Default, Deserialize)]
pub struct OrderFilters {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<OrderStatus>,
    pub technician_id: Option<Uuid>,
}

impl OrderFilters {
    pub fn page_request(&self) -> PageRequest {
        PaginationQuery {
            page: self.page,
            limit: self.limit,
        }
        .resolve()
    }
}

/// Priced line ready to insert
#[derive(Debug, Clone, PartialEq)]
pub struct PricedOrderLine {
    pub item_id: Uuid,
    pub bin_id: Option<Uuid>,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
}

// Order with its lines
#[derive(Debug, Serialize)]
pub struct OrderDetailResponse {
    #[serde(flatten)]
    pub order: OrderOverview,
    pub items: Vec<OrderItemDetail>,
}

// Result of a confirmation
#[derive(Debug, Serialize)]
pub struct OrderConfirmationResponse {
    pub order_id: Uuid,
    pub status: OrderStatus,
    pub total_amount: Decimal,
    pub commission_amount: Decimal,
    pub total_credit: Decimal,
    pub credit_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nested_lines_are_validated() {
        let request: CreateOrderRequest = serde_json::from_value(json!({
            "truckId": Uuid::new_v4(),
            "supplyHouseId": Uuid::new_v4(),
            "items": [{ "itemId": Uuid::new_v4(), "quantity": 0 }]
        }))
        .unwrap();
        assert!(request.validate().is_ok());
        assert!(request.validate_all().is_err());
    }

    #[test]
    fn empty_orders_are_rejected() {
        let request: CreateOrderRequest = serde_json::from_value(json!({
            "truck_id": Uuid::new_v4(),
            "supply_house_id": Uuid::new_v4(),
            "items": []
        }))
        .unwrap();
        assert!(request.validate().unwrap_err().field_errors().contains_key("items"));
    }
}
