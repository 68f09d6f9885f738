use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};

use crate::repositories::db_error;
use crate::utils::errors::AppError;

/// Raw counters for the admin dashboard, read in a single statement
#[derive(Debug, Clone, Default, FromRow)]
pub struct DashboardCounts {
    pub users_total: i64,
    pub admins: i64,
    pub managers: i64,
    pub technicians: i64,
    pub users_active: i64,
    pub users_pending: i64,
    pub users_inactive: i64,
    pub users_suspended: i64,
    pub trucks_total: i64,
    pub trucks_active: i64,
    pub trucks_maintenance: i64,
    pub trucks_inactive: i64,
    pub trucks_assigned: i64,
    pub orders_total: i64,
    pub orders_pending: i64,
    pub orders_confirmed: i64,
    pub orders_shipped: i64,
    pub orders_delivered: i64,
    pub orders_cancelled: i64,
    /// Confirmed, shipped and delivered orders only
    pub revenue: Decimal,
    pub commission: Decimal,
    pub credits_issued: Decimal,
    pub credits_redeemed: Decimal,
    pub catalog_items: i64,
    pub stocked_rows: i64,
    pub low_stock_rows: i64,
}

const DASHBOARD_COUNTS: &str = r#"
    SELECT
        u.total AS users_total, u.admins, u.managers, u.technicians,
        u.active AS users_active, u.pending AS users_pending,
        u.inactive AS users_inactive, u.suspended AS users_suspended,
        t.total AS trucks_total, t.active AS trucks_active, t.maintenance AS trucks_maintenance,
        t.inactive AS trucks_inactive, t.assigned AS trucks_assigned,
        o.total AS orders_total, o.pending AS orders_pending, o.confirmed AS orders_confirmed,
        o.shipped AS orders_shipped, o.delivered AS orders_delivered, o.cancelled AS orders_cancelled,
        o.revenue, o.commission,
        c.issued AS credits_issued, c.redeemed AS credits_redeemed,
        i.catalog_items, s.stocked_rows, s.low_stock_rows
    FROM
        (SELECT COUNT(*) AS total,
                COUNT(*) FILTER (WHERE role = 'admin') AS admins,
                COUNT(*) FILTER (WHERE role = 'manager') AS managers,
                COUNT(*) FILTER (WHERE role = 'technician') AS technicians,
                COUNT(*) FILTER (WHERE status = 'active') AS active,
                COUNT(*) FILTER (WHERE status = 'pending') AS pending,
                COUNT(*) FILTER (WHERE status = 'inactive') AS inactive,
                COUNT(*) FILTER (WHERE status = 'suspended') AS suspended
         FROM users) u,
        (SELECT COUNT(*) AS total,
                COUNT(*) FILTER (WHERE status = 'active') AS active,
                COUNT(*) FILTER (WHERE status = 'maintenance') AS maintenance,
                COUNT(*) FILTER (WHERE status = 'inactive') AS inactive,
                COUNT(*) FILTER (WHERE assigned_to IS NOT NULL) AS assigned
         FROM trucks) t,
        (SELECT COUNT(*) AS total,
                COUNT(*) FILTER (WHERE status = 'pending') AS pending,
                COUNT(*) FILTER (WHERE status = 'confirmed') AS confirmed,
                COUNT(*) FILTER (WHERE status = 'shipped') AS shipped,
                COUNT(*) FILTER (WHERE status = 'delivered') AS delivered,
                COUNT(*) FILTER (WHERE status = 'cancelled') AS cancelled,
                COALESCE(SUM(total_amount) FILTER (WHERE status IN ('confirmed', 'shipped', 'delivered')), 0) AS revenue,
                COALESCE(SUM(commission_amount) FILTER (WHERE status IN ('confirmed', 'shipped', 'delivered')), 0) AS commission
         FROM orders) o,
        (SELECT COALESCE(SUM(amount) FILTER (WHERE credit_type IN ('earned', 'bonus')), 0) AS issued,
                COALESCE(SUM(amount) FILTER (WHERE credit_type IN ('redeemed', 'spent')), 0) AS redeemed
         FROM credits
         WHERE status <> 'cancelled') c,
        (SELECT COUNT(*) AS catalog_items FROM inventory_items) i,
        (SELECT COUNT(*) AS stocked_rows,
                COUNT(*) FILTER (WHERE ti.quantity < COALESCE(ti.min_quantity, ii.min_quantity)) AS low_stock_rows
         FROM truck_inventory ti
         JOIN inventory_items ii ON ii.id = ti.item_id) s
"#;

pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn counts(&self) -> Result<DashboardCounts, AppError> {
        sqlx::query_as::<_, DashboardCounts>(DASHBOARD_COUNTS)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("dashboard counts", DASHBOARD_COUNTS))
    }
}
