use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::dto::common_dto::{PageRequest, Pagination, PaginationQuery};
use crate::models::credit::{Credit, CreditTotals, CreditType};

// Admin ledger adjustment
#[derive(Debug, Deserialize, Validate)]
pub struct AdjustCreditRequest {
    #[serde(alias = "technicianId")]
    pub technician_id: Uuid,

    #[serde(alias = "type")]
    pub credit_type: CreditType,

    pub amount: Decimal,

    #[validate(length(max = 500))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedemptionMethod {
    Cash,
    GiftCard,
}

impl RedemptionMethod {
    pub fn label(&self) -> &'static str {
        match self {
            RedemptionMethod::Cash => "cash",
            RedemptionMethod::GiftCard => "gift card",
        }
    }
}

// Technician redemption
#[derive(Debug, Deserialize)]
pub struct RedeemCreditRequest {
    pub amount: Decimal,
    pub method: RedemptionMethod,
}

// Ledger filters
#[derive(Debug, Default, Deserialize)]
pub struct CreditFilters {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub technician_id: Option<Uuid>,
    pub credit_type: Option<CreditType>,
}

impl CreditFilters {
    pub fn page_request(&self) -> PageRequest {
        PaginationQuery {
            page: self.page,
            limit: self.limit,
        }
        .resolve()
    }
}

#[derive(Debug, Serialize)]
pub struct CreditSummary {
    #[serde(flatten)]
    pub totals: CreditTotals,
    pub balance: Decimal,
}

impl From<CreditTotals> for CreditSummary {
    fn from(totals: CreditTotals) -> Self {
        let balance = totals.balance();
        Self { totals, balance }
    }
}

// `GET /api/credits`
#[derive(Debug, Serialize)]
pub struct CreditLedgerResponse {
    pub technician_id: Uuid,
    pub summary: CreditSummary,
    pub entries: Vec<Credit>,
    pub pagination: Pagination,
}

impl CreditLedgerResponse {
    pub fn new(
        technician_id: Uuid,
        totals: CreditTotals,
        entries: Vec<Credit>,
        page: PageRequest,
        total: i64,
    ) -> Self {
        Self {
            technician_id,
            summary: CreditSummary::from(totals),
            entries,
            pagination: Pagination::new(page.page, page.limit, total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn ledger_carries_balance_and_pagination() {
        let page = CreditFilters {
            page: Some(2),
            limit: Some(10),
            ..Default::default()
        }
        .page_request();
        let totals = CreditTotals {
            earned: dec!(120.00),
            bonus: dec!(10.00),
            redeemed: dec!(50.00),
            spent: dec!(5.00),
        };

        let ledger = CreditLedgerResponse::new(Uuid::new_v4(), totals, Vec::new(), page, 25);
        let body = serde_json::to_value(&ledger).unwrap();

        assert_eq!(body["pagination"]["page"], 2);
        assert_eq!(body["pagination"]["limit"], 10);
        assert_eq!(body["pagination"]["total"], 25);
        assert_eq!(body["pagination"]["pages"], 3);
        assert_eq!(ledger.summary.balance, dec!(75.00));
    }
}
