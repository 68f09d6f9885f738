use rust_decimal::{Decimal, RoundingStrategy};

use crate::dto::dashboard_dto::{CreditStats, DashboardResponse, FleetStats, InventoryStats, OrderStats, UserStats};
use crate::repositories::dashboard_repository::DashboardCounts;

fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `part / whole × 100`, 0 when the whole is 0
pub fn percentage(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    round_cents(part * Decimal::ONE_HUNDRED / whole)
}

pub fn count_percentage(part: i64, whole: i64) -> Decimal {
    percentage(Decimal::from(part), Decimal::from(whole))
}

pub fn build_dashboard(counts: &DashboardCounts) -> DashboardResponse {
    let billed_orders = counts.orders_confirmed + counts.orders_shipped + counts.orders_delivered;
    let average_order_value = if billed_orders == 0 {
        Decimal::ZERO
    } else {
        round_cents(counts.revenue / Decimal::from(billed_orders))
    };

    DashboardResponse {
        users: UserStats {
            total: counts.users_total,
            admins: counts.admins,
            managers: counts.managers,
            technicians: counts.technicians,
            active: counts.users_active,
            pending: counts.users_pending,
            inactive: counts.users_inactive,
            suspended: counts.users_suspended,
        },
        fleet: FleetStats {
            total: counts.trucks_total,
            active: counts.trucks_active,
            maintenance: counts.trucks_maintenance,
            inactive: counts.trucks_inactive,
            assigned: counts.trucks_assigned,
            utilization_percent: count_percentage(counts.trucks_assigned, counts.trucks_total),
        },
        orders: OrderStats {
            total: counts.orders_total,
            pending: counts.orders_pending,
            confirmed: counts.orders_confirmed,
            shipped: counts.orders_shipped,
            delivered: counts.orders_delivered,
            cancelled: counts.orders_cancelled,
            confirmation_rate_percent: count_percentage(billed_orders, counts.orders_total),
            revenue: counts.revenue,
            commission: counts.commission,
            average_order_value,
        },
        credits: CreditStats {
            issued: counts.credits_issued,
            redeemed: counts.credits_redeemed,
            outstanding: counts.credits_issued - counts.credits_redeemed,
            redemption_rate_percent: percentage(counts.credits_redeemed, counts.credits_issued),
        },
        inventory: InventoryStats {
            catalog_items: counts.catalog_items,
            stocked_rows: counts.stocked_rows,
            low_stock_rows: counts.low_stock_rows,
            low_stock_percent: count_percentage(counts.low_stock_rows, counts.stocked_rows),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn zero_whole_is_zero_percent() {
        assert_eq!(percentage(dec!(5), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(count_percentage(0, 0), Decimal::ZERO);
    }

    #[test]
    fn percentages_round_to_two_places() {
        assert_eq!(count_percentage(1, 3), dec!(33.33));
        assert_eq!(count_percentage(2, 3), dec!(66.67));
        assert_eq!(count_percentage(4, 4), dec!(100));
    }

    #[test]
    fn empty_database_gives_an_all_zero_dashboard() {
        assert_eq!(build_dashboard(&DashboardCounts::default()), DashboardResponse::default());
    }

    #[test]
    fn dashboard_derives_rates() {
        let counts = DashboardCounts {
            trucks_total: 8,
            trucks_assigned: 6,
            orders_total: 10,
            orders_pending: 3,
            orders_confirmed: 4,
            orders_delivered: 2,
            orders_cancelled: 1,
            revenue: dec!(1200.00),
            commission: dec!(120.00),
            credits_issued: dec!(60.00),
            credits_redeemed: dec!(25.00),
            stocked_rows: 40,
            low_stock_rows: 3,
            ..Default::default()
        };

        let dashboard = build_dashboard(&counts);
        assert_eq!(dashboard.fleet.utilization_percent, dec!(75));
        assert_eq!(dashboard.orders.confirmation_rate_percent, dec!(60));
        assert_eq!(dashboard.orders.average_order_value, dec!(200));
        assert_eq!(dashboard.credits.outstanding, dec!(35.00));
        assert_eq!(dashboard.credits.redemption_rate_percent, dec!(41.67));
        assert_eq!(dashboard.inventory.low_stock_percent, dec!(7.5));
    }
}
