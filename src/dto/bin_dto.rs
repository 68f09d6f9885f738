use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::truck::Truck;
use crate::models::truck_bin::{BinItem, TruckBin, TruckInventory};

// `POST /api/technician/trucks/:id/bins/:bin_id` body. Both camelCase (as sent
// by the web client) and snake_case keys are accepted.
#[derive(Debug, Default, Deserialize)]
pub struct UpsertBinItemRequest {
    #[serde(alias = "itemId")]
    pub item_id: Option<Uuid>,
    pub quantity: Option<i32>,
    #[serde(alias = "minQuantity")]
    pub min_quantity: Option<i32>,
    #[serde(alias = "maxQuantity")]
    pub max_quantity: Option<i32>,
}

// `DELETE ...?itemId=` query
#[derive(Debug, Default, Deserialize)]
pub struct RemoveBinItemQuery {
    #[serde(alias = "itemId")]
    pub item_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TruckSummary {
    pub id: Uuid,
    pub truck_number: String,
    pub status: String,
    pub assigned_to: Option<Uuid>,
}

impl From<&Truck> for TruckSummary {
    fn from(truck: &Truck) -> Self {
        Self {
            id: truck.id,
            truck_number: truck.truck_number.clone(),
            status: truck.status.clone(),
            assigned_to: truck.assigned_to,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BinSummary {
    pub distinct_items: usize,
    pub total_quantity: i64,
    pub total_value: Decimal,
    pub low_stock_items: usize,
}

impl BinSummary {
    pub fn from_items(items: &[BinItem]) -> Self {
        Self {
            distinct_items: items.len(),
            total_quantity: items.iter().map(|item| i64::from(item.quantity)).sum(),
            total_value: items.iter().map(BinItem::line_value).sum(),
            low_stock_items: items.iter().filter(|item| item.is_low_stock()).count(),
        }
    }
}

// Bin contents
#[derive(Debug, Serialize)]
pub struct BinInventoryResponse {
    pub truck: TruckSummary,
    pub bin: TruckBin,
    pub items: Vec<BinItem>,
    pub summary: BinSummary,
    pub effective_user_id: Uuid,
}

// Result of an upsert
#[derive(Debug, Serialize)]
pub struct BinItemUpdateResponse {
    pub item: TruckInventory,
    pub effective_user_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn item(quantity: i32, min: Option<i32>, price: Decimal) -> BinItem {
        BinItem {
            item_id: Uuid::new_v4(),
            sku: "INV-42".into(),
            name: "Capacitor 45/5 MFD".into(),
            category: "electrical".into(),
            unit: "each".into(),
            quantity,
            min_quantity: min,
            max_quantity: None,
            unit_price: price,
            last_restocked: None,
        }
    }

    #[test]
    fn summary_aggregates() {
        let items = vec![item(5, Some(2), dec!(12.50)), item(1, Some(3), dec!(4))];
        let summary = BinSummary::from_items(&items);
        assert_eq!(summary.distinct_items, 2);
        assert_eq!(summary.total_quantity, 6);
        assert_eq!(summary.total_value, dec!(66.50));
        assert_eq!(summary.low_stock_items, 1);
        assert_eq!(BinSummary::from_items(&[]), BinSummary::default());
    }

    #[test]
    fn upsert_accepts_camel_case() {
        let id = Uuid::new_v4();
        let body: UpsertBinItemRequest =
            serde_json::from_value(json!({ "itemId": id, "quantity": 5, "minQuantity": 1 })).unwrap();
        assert_eq!(body.item_id, Some(id));
        assert_eq!(body.quantity, Some(5));
        assert_eq!(body.min_quantity, Some(1));
    }
}
