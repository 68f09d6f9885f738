//! Orders placed with supply houses

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

text_enum! {
    /// Order lifecycle - maps the `orders.status` column
    pub enum OrderStatus {
        Pending => "pending",
        Confirmed => "confirmed",
        Shipped => "shipped",
        Delivered => "delivered",
        Cancelled => "cancelled",
    }
}

impl OrderStatus {
    /// Allowed forward transitions
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Pending, Cancelled)
                | (Confirmed, Shipped)
                | (Confirmed, Cancelled)
                | (Shipped, Delivered)
        )
    }
}

/// Row of the `orders` table
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Order {
    pub id: Uuid,
    pub order_number: String,
    pub technician_id: Uuid,
    pub truck_id: Uuid,
    pub supply_house_id: Uuid,
    pub status: String,
    pub total_amount: Decimal,
    pub commission_amount: Decimal,
    pub total_credit: Decimal,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn status(&self) -> Option<OrderStatus> {
        OrderStatus::from_str(&self.status)
    }
}

/// Order joined with display names, for listings and invoices
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OrderOverview {
    pub id: Uuid,
    pub order_number: String,
    pub technician_id: Uuid,
    pub technician_name: String,
    pub truck_id: Uuid,
    pub truck_number: String,
    pub supply_house_id: Uuid,
    pub supply_house_name: String,
    pub status: String,
    pub total_amount: Decimal,
    pub commission_amount: Decimal,
    pub total_credit: Decimal,
    pub notes: Option<String>,
    pub item_count: i64,
    pub created_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
}

/// Row of the `order_items` table joined with the catalog entry
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OrderItemDetail {
    pub id: Uuid,
    pub order_id: Uuid,
    pub item_id: Uuid,
    pub sku: String,
    pub name: String,
    pub bin_id: Option<Uuid>,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_transitions() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Confirmed));
        assert!(OrderStatus::Confirmed.can_transition_to(OrderStatus::Shipped));
        assert!(OrderStatus::Shipped.can_transition_to(OrderStatus::Delivered));
        assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Pending));
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Pending));
    }
}
