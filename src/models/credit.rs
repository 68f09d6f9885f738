//! Technician credit ledger

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

text_enum! {
    pub enum CreditType {
        Earned => "earned",
        Bonus => "bonus",
        Redeemed => "redeemed",
        Spent => "spent",
    }
}

impl CreditType {
    /// Entries that reduce the balance
    pub fn is_debit(&self) -> bool {
        matches!(self, CreditType::Redeemed | CreditType::Spent)
    }
}

text_enum! {
    pub enum CreditStatus {
        Pending => "pending",
        Available => "available",
        Completed => "completed",
        Cancelled => "cancelled",
    }
}

/// Row of the `credits` table. `amount` is always positive; the type says
/// which way it moves the balance.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Credit {
    pub id: Uuid,
    pub technician_id: Uuid,
    pub order_id: Option<Uuid>,
    pub credit_type: String,
    pub amount: Decimal,
    pub status: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Per-type sums for one technician, cancelled entries excluded
#[derive(Debug, Clone, Default, FromRow, Serialize)]
pub struct CreditTotals {
    pub earned: Decimal,
    pub bonus: Decimal,
    pub redeemed: Decimal,
    pub spent: Decimal,
}

impl CreditTotals {
    pub fn balance(&self) -> Decimal {
        self.earned + self.bonus - self.redeemed - self.spent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn balance_subtracts_debits() {
        let totals = CreditTotals {
            earned: dec!(120.50),
            bonus: dec!(20),
            redeemed: dec!(50),
            spent: dec!(10.25),
        };
        assert_eq!(totals.balance(), dec!(80.25));
        assert!(CreditType::Redeemed.is_debit());
        assert!(!CreditType::Bonus.is_debit());
    }
}
