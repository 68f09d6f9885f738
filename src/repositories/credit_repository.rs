use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::models::credit::{Credit, CreditStatus, CreditTotals, CreditType};
use crate::repositories::{db_error, rollback};
use crate::utils::errors::AppError;

const LIST_CREDITS: &str = r#"
    SELECT id, technician_id, order_id, credit_type, amount, status, description, created_at
    FROM credits
    WHERE ($1::uuid IS NULL OR technician_id = $1)
      AND ($2::text IS NULL OR credit_type = $2)
    ORDER BY created_at DESC
    LIMIT $3 OFFSET $4
"#;

const COUNT_CREDITS: &str = r#"
    SELECT COUNT(*)
    FROM credits
    WHERE ($1::uuid IS NULL OR technician_id = $1)
      AND ($2::text IS NULL OR credit_type = $2)
"#;

const CREDIT_TOTALS: &str = r#"
    SELECT COALESCE(SUM(amount) FILTER (WHERE credit_type = 'earned'), 0) AS earned,
           COALESCE(SUM(amount) FILTER (WHERE credit_type = 'bonus'), 0) AS bonus,
           COALESCE(SUM(amount) FILTER (WHERE credit_type = 'redeemed'), 0) AS redeemed,
           COALESCE(SUM(amount) FILTER (WHERE credit_type = 'spent'), 0) AS spent
    FROM credits
    WHERE technician_id = $1 AND status <> 'cancelled'
"#;

const LOCK_TECHNICIAN: &str = "SELECT id FROM users WHERE id = $1 FOR UPDATE";

const INSERT_CREDIT: &str = r#"
    INSERT INTO credits (id, technician_id, order_id, credit_type, amount, status, description, created_at)
    VALUES ($1, $2, $3, $4, $5, $6, $7, NOW())
    RETURNING id, technician_id, order_id, credit_type, amount, status, description, created_at
"#;

/// Ledger entry to post
#[derive(Debug, Clone)]
pub struct NewCredit {
    pub technician_id: Uuid,
    pub order_id: Option<Uuid>,
    pub credit_type: CreditType,
    pub amount: Decimal,
    pub status: CreditStatus,
    pub description: Option<String>,
}

#[derive(Debug, Default)]
pub struct CreditQuery {
    pub technician_id: Option<Uuid>,
    pub credit_type: Option<CreditType>,
    pub limit: i64,
    pub offset: i64,
}

pub struct CreditRepository {
    pool: PgPool,
}

impl CreditRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, query: &CreditQuery) -> Result<(Vec<Credit>, i64), AppError> {
        let credit_type = query.credit_type.map(|t| t.as_str());

        let credits = sqlx::query_as::<_, Credit>(LIST_CREDITS)
            .bind(query.technician_id)
            .bind(credit_type)
            .bind(query.limit)
            .bind(query.offset)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("list credits", LIST_CREDITS))?;

        let total: i64 = sqlx::query_scalar(COUNT_CREDITS)
            .bind(query.technician_id)
            .bind(credit_type)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("count credits", COUNT_CREDITS))?;

        Ok((credits, total))
    }

    pub async fn totals(&self, technician_id: Uuid) -> Result<CreditTotals, AppError> {
        sqlx::query_as::<_, CreditTotals>(CREDIT_TOTALS)
            .bind(technician_id)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("credit totals", CREDIT_TOTALS))
    }

    /// Posts a ledger entry. Debits are checked against the balance while the
    /// technician row is locked, so concurrent redemptions cannot overdraw it.
    pub async fn post(&self, entry: NewCredit) -> Result<Credit, AppError> {
        let mut tx = self.pool.begin().await?;

        match Self::post_in(&mut tx, &entry).await {
            Ok(credit) => {
                tx.commit().await?;
                log::info!(
                    "💳 {} {} posted for technician {}",
                    credit.credit_type, credit.amount, credit.technician_id
                );
                Ok(credit)
            }
            Err(e) => {
                rollback(tx, "post credit").await;
                Err(e)
            }
        }
    }

    async fn post_in(tx: &mut Transaction<'_, Postgres>, entry: &NewCredit) -> Result<Credit, AppError> {
        let locked: Option<Uuid> = sqlx::query_scalar(LOCK_TECHNICIAN)
            .bind(entry.technician_id)
            .fetch_optional(&mut **tx)
            .await
            .map_err(db_error("lock technician", LOCK_TECHNICIAN))?;

        if locked.is_none() {
            return Err(AppError::NotFound("Technician not found".to_string()));
        }

        if entry.credit_type.is_debit() {
            let totals = sqlx::query_as::<_, CreditTotals>(CREDIT_TOTALS)
                .bind(entry.technician_id)
                .fetch_one(&mut **tx)
                .await
                .map_err(db_error("credit totals", CREDIT_TOTALS))?;

            let balance = totals.balance();
            if entry.amount > balance {
                return Err(AppError::BadRequest(format!(
                    "Insufficient credit balance: requested {}, available {}",
                    entry.amount, balance
                )));
            }
        }

        sqlx::query_as::<_, Credit>(INSERT_CREDIT)
            .bind(Uuid::new_v4())
            .bind(entry.technician_id)
            .bind(entry.order_id)
            .bind(entry.credit_type.as_str())
            .bind(entry.amount)
            .bind(entry.status.as_str())
            .bind(entry.description.as_deref())
            .fetch_one(&mut **tx)
            .await
            .map_err(db_error("insert credit", INSERT_CREDIT))
    }
}
