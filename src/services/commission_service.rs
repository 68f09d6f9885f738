//! Order pricing and commission math

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use uuid::Uuid;

use crate::dto::order_dto::{OrderLineRequest, PricedOrderLine};
use crate::models::inventory_item::InventoryItem;
use crate::services::settings_service::CommissionRates;
use crate::utils::errors::AppError;

/// `amount × rate%`, rounded half away from zero to cents
pub fn percentage_of(amount: Decimal, rate: Decimal) -> Decimal {
    (amount * rate / Decimal::ONE_HUNDRED).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Amounts written when an order is confirmed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderAccounting {
    pub commission_amount: Decimal,
    pub total_credit: Decimal,
}

impl OrderAccounting {
    pub fn for_total(total: Decimal, rates: &CommissionRates) -> Self {
        Self {
            commission_amount: percentage_of(total, rates.commission_rate),
            total_credit: percentage_of(total, rates.technician_credit_rate),
        }
    }
}

/// Prices each requested line from the catalog and returns the lines with
/// the order total
pub fn price_lines(
    lines: &[OrderLineRequest],
    catalog: &[InventoryItem],
) -> Result<(Vec<PricedOrderLine>, Decimal), AppError> {
    let prices: HashMap<Uuid, Decimal> = catalog.iter().map(|item| (item.id, item.unit_price)).collect();

    let mut priced = Vec::with_capacity(lines.len());
    let mut total = Decimal::ZERO;

    for line in lines {
        let unit_price = *prices
            .get(&line.item_id)
            .ok_or_else(|| AppError::NotFound(format!("Inventory item {} not found", line.item_id)))?;

        let total_price = unit_price * Decimal::from(line.quantity);
        total += total_price;

        priced.push(PricedOrderLine {
            item_id: line.item_id,
            bin_id: line.bin_id,
            quantity: line.quantity,
            unit_price,
            total_price,
        });
    }

    Ok((priced, total))
}

/// `ORD-YYYYMMDD-XXXXXXXX`, the suffix being 8 random hex digits
pub fn generate_order_number(now: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string()[..8].to_uppercase();
    format!("ORD-{}-{}", now.format("%Y%m%d"), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn catalog_item(price: Decimal) -> InventoryItem {
        InventoryItem {
            id: Uuid::new_v4(),
            sku: "INV-42".into(),
            name: "Contactor 40A".into(),
            category: "electrical".into(),
            unit: "each".into(),
            standard_quantity: 4,
            min_quantity: 1,
            unit_price: price,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn percentages_round_to_cents() {
        assert_eq!(percentage_of(dec!(100), dec!(10)), dec!(10.00));
        assert_eq!(percentage_of(dec!(123.45), dec!(5)), dec!(6.17));
        assert_eq!(percentage_of(dec!(0.50), dec!(5)), dec!(0.03));
        assert_eq!(percentage_of(dec!(99.99), dec!(0)), dec!(0));
    }

    #[test]
    fn accounting_uses_both_rates() {
        let rates = CommissionRates::default();
        let accounting = OrderAccounting::for_total(dec!(250.00), &rates);
        assert_eq!(accounting.commission_amount, dec!(25.00));
        assert_eq!(accounting.total_credit, dec!(12.50));
    }

    #[test]
    fn lines_are_priced_from_the_catalog() {
        let capacitor = catalog_item(dec!(12.50));
        let contactor = catalog_item(dec!(31.99));
        let lines = vec![
            OrderLineRequest { item_id: capacitor.id, bin_id: None, quantity: 4 },
            OrderLineRequest { item_id: contactor.id, bin_id: Some(Uuid::new_v4()), quantity: 1 },
        ];

        let (priced, total) = price_lines(&lines, &[capacitor, contactor]).unwrap();
        assert_eq!(priced[0].total_price, dec!(50.00));
        assert_eq!(priced[1].unit_price, dec!(31.99));
        assert_eq!(total, dec!(81.99));
    }

    #[test]
    fn unknown_items_are_not_found() {
        let lines = vec![OrderLineRequest { item_id: Uuid::new_v4(), bin_id: None, quantity: 1 }];
        assert!(matches!(price_lines(&lines, &[]), Err(AppError::NotFound(_))));
    }

    #[test]
    fn order_numbers_carry_the_date() {
        let now = Utc.with_ymd_and_hms(2024, 3, 7, 15, 0, 0).unwrap();
        let number = generate_order_number(now);
        assert!(number.starts_with("ORD-20240307-"));
        assert_eq!(number.len(), "ORD-20240307-".len() + 8);
        assert!(number[13..].chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()));
    }
}
