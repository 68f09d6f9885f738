use rust_decimal::Decimal;
use sqlx::PgPool;
use validator::Validate;

use crate::dto::common_dto::{ApiResponse, PaginatedResponse};
use crate::dto::credit_dto::{AdjustCreditRequest, CreditFilters, CreditLedgerResponse, RedeemCreditRequest};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::credit::{Credit, CreditStatus, CreditType};
use crate::models::user::UserRole;
use crate::repositories::credit_repository::{CreditQuery, CreditRepository, NewCredit};
use crate::repositories::settings_repository::SettingsRepository;
use crate::repositories::user_repository::UserRepository;
use crate::services::access_service::technician_scope;
use crate::services::settings_service::{document_from_rows, CommissionRates};
use crate::utils::errors::{not_found_error, AppError};

/// Positive amount with at most two decimals
fn validate_amount(amount: Decimal) -> Result<Decimal, AppError> {
    if amount <= Decimal::ZERO {
        return Err(AppError::BadRequest("amount must be greater than zero".to_string()));
    }
    if amount.round_dp(2) != amount {
        return Err(AppError::BadRequest("amount cannot have more than two decimals".to_string()));
    }
    Ok(amount)
}

pub struct CreditController {
    credits: CreditRepository,
    users: UserRepository,
    settings: SettingsRepository,
}

impl CreditController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            credits: CreditRepository::new(pool.clone()),
            users: UserRepository::new(pool.clone()),
            settings: SettingsRepository::new(pool),
        }
    }

    /// Admin ledger view across technicians
    pub async fn list(&self, filters: CreditFilters) -> Result<PaginatedResponse<Credit>, AppError> {
        let page = filters.page_request();
        let query = CreditQuery {
            technician_id: filters.technician_id,
            credit_type: filters.credit_type,
            limit: page.limit,
            offset: page.offset(),
        };

        let (credits, total) = self.credits.list(&query).await?;
        Ok(PaginatedResponse::new(credits, page, total))
    }

    /// One technician's balance and most recent entries
    pub async fn ledger(
        &self,
        caller: &AuthenticatedUser,
        filters: CreditFilters,
    ) -> Result<ApiResponse<CreditLedgerResponse>, AppError> {
        let technician_id = technician_scope(caller, filters.technician_id)?
            .ok_or_else(|| AppError::BadRequest("technician_id is required".to_string()))?;

        let page = filters.page_request();
        let query = CreditQuery {
            technician_id: Some(technician_id),
            credit_type: filters.credit_type,
            limit: page.limit,
            offset: page.offset(),
        };

        let totals = self.credits.totals(technician_id).await?;
        let (entries, total) = self.credits.list(&query).await?;

        Ok(ApiResponse::success(CreditLedgerResponse::new(
            technician_id,
            totals,
            entries,
            page,
            total,
        )))
    }

    pub async fn adjust(
        &self,
        caller: &AuthenticatedUser,
        request: AdjustCreditRequest,
    ) -> Result<ApiResponse<Credit>, AppError> {
        request.validate()?;
        let amount = validate_amount(request.amount)?;

        let technician = self
            .users
            .find_by_id(request.technician_id)
            .await?
            .ok_or_else(|| not_found_error("Technician", &request.technician_id.to_string()))?;
        if technician.role() != Some(UserRole::Technician) {
            return Err(AppError::BadRequest(format!("{} is not a technician", technician.email)));
        }

        let status = if request.credit_type.is_debit() {
            CreditStatus::Completed
        } else {
            CreditStatus::Available
        };
        let description = request
            .description
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| format!("Manual {} adjustment by {}", request.credit_type, caller.email));

        let credit = self
            .credits
            .post(NewCredit {
                technician_id: technician.id,
                order_id: None,
                credit_type: request.credit_type,
                amount,
                status,
                description: Some(description),
            })
            .await?;

        Ok(ApiResponse::success_with_message(credit, "Credit adjustment recorded"))
    }

    pub async fn redeem(
        &self,
        caller: &AuthenticatedUser,
        request: RedeemCreditRequest,
    ) -> Result<ApiResponse<Credit>, AppError> {
        if caller.role != UserRole::Technician {
            return Err(AppError::Forbidden("Only technicians can redeem credits".to_string()));
        }

        let amount = validate_amount(request.amount)?;
        let rows = self.settings.all().await?;
        let minimum = CommissionRates::from_document(&document_from_rows(&rows)).minimum_redemption;
        if amount < minimum {
            return Err(AppError::BadRequest(format!("Minimum redemption is {}", minimum)));
        }

        let credit = self
            .credits
            .post(NewCredit {
                technician_id: caller.user_id,
                order_id: None,
                credit_type: CreditType::Redeemed,
                amount,
                status: CreditStatus::Pending,
                description: Some(format!("Redemption via {}", request.method.label())),
            })
            .await?;

        Ok(ApiResponse::success_with_message(credit, "Redemption requested"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn amounts_must_be_positive_cents() {
        assert_eq!(validate_amount(dec!(25.00)).unwrap(), dec!(25));
        assert!(validate_amount(dec!(0)).is_err());
        assert!(validate_amount(dec!(-5)).is_err());
        assert!(validate_amount(dec!(1.005)).is_err());
    }
}
