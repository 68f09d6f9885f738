//! Data access
//!
//! One repository per aggregate. Queries are built at runtime with
//! `sqlx::query_as` so the crate compiles without a live database.

pub mod credit_repository;
pub mod dashboard_repository;
pub mod inventory_repository;
pub mod order_repository;
pub mod settings_repository;
pub mod supply_house_repository;
pub mod truck_bin_repository;
pub mod truck_repository;
pub mod user_repository;

use std::future::Future;

use sqlx::{Postgres, Transaction};

use crate::utils::errors::AppError;

/// Logs a failed statement with its SQL text and turns it into an `AppError`
pub(crate) fn db_error(context: &'static str, sql: &'static str) -> impl Fn(sqlx::Error) -> AppError {
    move |error| {
        log::error!("❌ {} failed: {} | sql: {}", context, error, sql.split_whitespace().collect::<Vec<_>>().join(" "));
        AppError::Database(error)
    }
}

/// Rolls back `tx`. A failed rollback is logged, never returned, so callers
/// keep propagating the statement error that aborted the transaction.
pub(crate) async fn rollback(tx: Transaction<'_, Postgres>, context: &'static str) {
    log_rollback(tx.rollback(), context).await;
}

async fn log_rollback<F>(rollback: F, context: &'static str) -> bool
where
    F: Future<Output = Result<(), sqlx::Error>>,
{
    match rollback.await {
        Ok(()) => true,
        Err(e) => {
            log::warn!("⚠️ rollback after {} failed: {}", context, e);
            false
        }
    }
}

/// Postgres foreign-key violation (23503)
pub(crate) fn is_foreign_key_violation(error: &AppError) -> bool {
    match error {
        AppError::Database(sqlx::Error::Database(db)) => db.code().as_deref() == Some("23503"),
        _ => false,
    }
}

/// Postgres unique violation (23505)
pub(crate) fn is_unique_violation(error: &AppError) -> bool {
    match error {
        AppError::Database(db) => crate::utils::errors::is_unique_violation(db),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn failed_rollback_is_swallowed() {
        assert!(log_rollback(async { Ok(()) }, "create order").await);
        assert!(!log_rollback(async { Err(sqlx::Error::PoolClosed) }, "create order").await);
    }

    #[test]
    fn statement_error_survives_a_failed_rollback() {
        let error = db_error("create order", "INSERT INTO orders DEFAULT VALUES")(sqlx::Error::RowNotFound);
        assert!(matches!(error, AppError::Database(sqlx::Error::RowNotFound)));
    }
}
