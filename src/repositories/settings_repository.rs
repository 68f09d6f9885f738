use sqlx::PgPool;

use crate::models::settings::{Setting, SettingCategory};
use crate::repositories::{db_error, rollback};
use crate::utils::errors::AppError;

const SELECT_ALL: &str = "SELECT key, value, category, updated_at FROM settings ORDER BY category, key";

const UPSERT_SETTING: &str = r#"
    INSERT INTO settings (key, value, category, updated_at)
    VALUES ($1, $2, $3, NOW())
    ON CONFLICT (key) DO UPDATE
    SET value = EXCLUDED.value,
        category = EXCLUDED.category,
        updated_at = NOW()
"#;

/// One normalized setting to store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingEntry {
    pub key: String,
    pub value: String,
    pub category: SettingCategory,
}

pub struct SettingsRepository {
    pool: PgPool,
}

impl SettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn all(&self) -> Result<Vec<Setting>, AppError> {
        sqlx::query_as::<_, Setting>(SELECT_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("list settings", SELECT_ALL))
    }

    /// Writes every entry or none of them
    pub async fn upsert_all(&self, entries: &[SettingEntry]) -> Result<u64, AppError> {
        let mut tx = self.pool.begin().await?;
        let mut written = 0;

        for entry in entries {
            let result = sqlx::query(UPSERT_SETTING)
                .bind(&entry.key)
                .bind(&entry.value)
                .bind(entry.category.as_str())
                .execute(&mut *tx)
                .await;

            match result {
                Ok(done) => written += done.rows_affected(),
                Err(e) => {
                    let error = db_error("upsert setting", UPSERT_SETTING)(e);
                    rollback(tx, "upsert setting").await;
                    return Err(error);
                }
            }
        }

        tx.commit().await?;
        log::info!("⚙️ {} settings written", written);
        Ok(written)
    }
}
