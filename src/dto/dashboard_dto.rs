use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserStats {
    pub total: i64,
    pub admins: i64,
    pub managers: i64,
    pub technicians: i64,
    pub active: i64,
    pub pending: i64,
    pub inactive: i64,
    pub suspended: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FleetStats {
    pub total: i64,
    pub active: i64,
    pub maintenance: i64,
    pub inactive: i64,
    pub assigned: i64,
    pub utilization_percent: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OrderStats {
    pub total: i64,
    pub pending: i64,
    pub confirmed: i64,
    pub shipped: i64,
    pub delivered: i64,
    pub cancelled: i64,
    pub confirmation_rate_percent: Decimal,
    pub revenue: Decimal,
    pub commission: Decimal,
    pub average_order_value: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreditStats {
    pub issued: Decimal,
    pub redeemed: Decimal,
    pub outstanding: Decimal,
    pub redemption_rate_percent: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InventoryStats {
    pub catalog_items: i64,
    pub stocked_rows: i64,
    pub low_stock_rows: i64,
    pub low_stock_percent: Decimal,
}

// `GET /api/admin/dashboard`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardResponse {
    pub users: UserStats,
    pub fleet: FleetStats,
    pub orders: OrderStats,
    pub credits: CreditStats,
    pub inventory: InventoryStats,
}
