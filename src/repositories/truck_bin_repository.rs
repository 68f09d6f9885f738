//! Bin inventory storage
//!
//! The bin endpoints talk to storage through `TruckBinStore` so the access
//! rules can be exercised without a database. `PgTruckBinStore` is the
//! production implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::truck::Truck;
use crate::models::truck_bin::{BinItem, TruckBin, TruckBinOverview, TruckInventory};
use crate::models::user::User;
use crate::repositories::{db_error, rollback};
use crate::utils::errors::AppError;

const SELECT_TRUCK: &str = r#"
    SELECT id, truck_number, status, assigned_to, license_plate, mileage,
           last_maintenance_date, next_maintenance_date, created_at, updated_at
    FROM trucks
    WHERE id = $1
"#;

const SELECT_USER: &str = r#"
    SELECT id, name, email, phone, password_hash, role, status, created_at, updated_at
    FROM users
    WHERE id = $1
"#;

const SELECT_BIN: &str = r#"
    SELECT id, truck_id, bin_code, name, location, created_at
    FROM truck_bins
    WHERE id = $1 AND truck_id = $2
"#;

pub(crate) const LIST_BINS: &str = r#"
    SELECT b.id, b.truck_id, b.bin_code, b.name, b.location,
           COUNT(ti.id) AS item_count,
           COALESCE(SUM(ti.quantity), 0)::BIGINT AS total_quantity,
           b.created_at
    FROM truck_bins b
    LEFT JOIN truck_inventory ti ON ti.bin_id = b.id
    WHERE b.truck_id = $1
    GROUP BY b.id
    ORDER BY b.bin_code
"#;

const BIN_ITEMS: &str = r#"
    SELECT ii.id AS item_id, ii.sku, ii.name, ii.category, ii.unit,
           ti.quantity,
           COALESCE(ti.min_quantity, ii.min_quantity) AS min_quantity,
           ti.max_quantity,
           ii.unit_price, ti.last_restocked
    FROM truck_inventory ti
    JOIN inventory_items ii ON ii.id = ti.item_id
    WHERE ti.truck_id = $1 AND ti.bin_id = $2
    ORDER BY ii.sku
"#;

const UPSERT_ITEM: &str = r#"
    INSERT INTO truck_inventory (id, truck_id, bin_id, item_id, quantity, min_quantity, max_quantity,
                                 last_restocked, updated_at)
    VALUES ($1, $2, $3, $4, $5, $6, $7, NOW(), NOW())
    ON CONFLICT (truck_id, bin_id, item_id) DO UPDATE
    SET quantity = EXCLUDED.quantity,
        min_quantity = COALESCE(EXCLUDED.min_quantity, truck_inventory.min_quantity),
        max_quantity = COALESCE(EXCLUDED.max_quantity, truck_inventory.max_quantity),
        last_restocked = NOW(),
        updated_at = NOW()
    RETURNING id, truck_id, bin_id, item_id, quantity, min_quantity, max_quantity, last_restocked, updated_at
"#;

const DELETE_ITEM: &str = r#"
    DELETE FROM truck_inventory
    WHERE truck_id = $1 AND bin_id = $2 AND item_id = $3
    RETURNING id, truck_id, bin_id, item_id, quantity, min_quantity, max_quantity, last_restocked, updated_at
"#;

const TOUCH_TRUCK: &str = "UPDATE trucks SET updated_at = NOW() WHERE id = $1";

/// Values written by a bin upsert
#[derive(Debug, Clone)]
pub struct BinItemUpsert {
    pub truck_id: Uuid,
    pub bin_id: Uuid,
    pub item_id: Uuid,
    pub quantity: i32,
    pub min_quantity: Option<i32>,
    pub max_quantity: Option<i32>,
}

#[async_trait]
pub trait TruckBinStore: Send + Sync {
    async fn find_truck(&self, truck_id: Uuid) -> Result<Option<Truck>, AppError>;

    async fn find_user(&self, user_id: Uuid) -> Result<Option<User>, AppError>;

    /// Bin only if it belongs to the truck
    async fn find_bin(&self, truck_id: Uuid, bin_id: Uuid) -> Result<Option<TruckBin>, AppError>;

    async fn item_exists(&self, item_id: Uuid) -> Result<bool, AppError>;

    async fn bin_items(&self, truck_id: Uuid, bin_id: Uuid) -> Result<Vec<BinItem>, AppError>;

    async fn list_bins(&self, truck_id: Uuid) -> Result<Vec<TruckBinOverview>, AppError>;

    /// Writes the quantity for `(truck, bin, item)`, replacing any previous value
    async fn upsert_item(&self, upsert: BinItemUpsert) -> Result<TruckInventory, AppError>;

    /// `None` when there was nothing to delete
    async fn remove_item(
        &self,
        truck_id: Uuid,
        bin_id: Uuid,
        item_id: Uuid,
    ) -> Result<Option<TruckInventory>, AppError>;
}

#[derive(Clone)]
pub struct PgTruckBinStore {
    pool: PgPool,
}

impl PgTruckBinStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TruckBinStore for PgTruckBinStore {
    async fn find_truck(&self, truck_id: Uuid) -> Result<Option<Truck>, AppError> {
        sqlx::query_as::<_, Truck>(SELECT_TRUCK)
            .bind(truck_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("find truck", SELECT_TRUCK))
    }

    async fn find_user(&self, user_id: Uuid) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(SELECT_USER)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("find user", SELECT_USER))
    }

    async fn find_bin(&self, truck_id: Uuid, bin_id: Uuid) -> Result<Option<TruckBin>, AppError> {
        sqlx::query_as::<_, TruckBin>(SELECT_BIN)
            .bind(bin_id)
            .bind(truck_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("find bin", SELECT_BIN))
    }

    async fn item_exists(&self, item_id: Uuid) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM inventory_items WHERE id = $1)")
            .bind(item_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn bin_items(&self, truck_id: Uuid, bin_id: Uuid) -> Result<Vec<BinItem>, AppError> {
        sqlx::query_as::<_, BinItem>(BIN_ITEMS)
            .bind(truck_id)
            .bind(bin_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("list bin items", BIN_ITEMS))
    }

    async fn list_bins(&self, truck_id: Uuid) -> Result<Vec<TruckBinOverview>, AppError> {
        sqlx::query_as::<_, TruckBinOverview>(LIST_BINS)
            .bind(truck_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("list bins", LIST_BINS))
    }

    async fn upsert_item(&self, upsert: BinItemUpsert) -> Result<TruckInventory, AppError> {
        let mut tx = self.pool.begin().await?;

        let row = match sqlx::query_as::<_, TruckInventory>(UPSERT_ITEM)
            .bind(Uuid::new_v4())
            .bind(upsert.truck_id)
            .bind(upsert.bin_id)
            .bind(upsert.item_id)
            .bind(upsert.quantity)
            .bind(upsert.min_quantity)
            .bind(upsert.max_quantity)
            .fetch_one(&mut *tx)
            .await
        {
            Ok(row) => row,
            Err(e) => {
                let error = db_error("upsert bin item", UPSERT_ITEM)(e);
                rollback(tx, "upsert bin item").await;
                return Err(error);
            }
        };

        if let Err(e) = sqlx::query(TOUCH_TRUCK).bind(upsert.truck_id).execute(&mut *tx).await {
            let error = db_error("touch truck", TOUCH_TRUCK)(e);
            rollback(tx, "touch truck").await;
            return Err(error);
        }

        tx.commit().await?;
        log::info!(
            "📦 Bin {} on truck {}: item {} set to {}",
            upsert.bin_id, upsert.truck_id, upsert.item_id, row.quantity
        );
        Ok(row)
    }

    async fn remove_item(
        &self,
        truck_id: Uuid,
        bin_id: Uuid,
        item_id: Uuid,
    ) -> Result<Option<TruckInventory>, AppError> {
        let mut tx = self.pool.begin().await?;

        let removed = match sqlx::query_as::<_, TruckInventory>(DELETE_ITEM)
            .bind(truck_id)
            .bind(bin_id)
            .bind(item_id)
            .fetch_optional(&mut *tx)
            .await
        {
            Ok(removed) => removed,
            Err(e) => {
                let error = db_error("delete bin item", DELETE_ITEM)(e);
                rollback(tx, "delete bin item").await;
                return Err(error);
            }
        };

        let Some(removed) = removed else {
            rollback(tx, "delete bin item").await;
            return Ok(None);
        };

        if let Err(e) = sqlx::query(TOUCH_TRUCK).bind(truck_id).execute(&mut *tx).await {
            let error = db_error("touch truck", TOUCH_TRUCK)(e);
            rollback(tx, "touch truck").await;
            return Err(error);
        }

        tx.commit().await?;
        log::info!("🗑️ Removed item {} from bin {} on truck {}", item_id, bin_id, truck_id);
        Ok(Some(removed))
    }
}
