use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::inventory_dto::{CreateInventoryItemRequest, UpdateInventoryItemRequest};
use crate::models::inventory_item::InventoryItem;
use crate::repositories::db_error;
use crate::utils::errors::AppError;

const LIST_ITEMS: &str = r#"
    SELECT id, sku, name, category, unit, standard_quantity, min_quantity, unit_price, created_at
    FROM inventory_items
    WHERE ($1::text IS NULL OR sku ILIKE $1 OR name ILIKE $1)
      AND ($2::text IS NULL OR LOWER(category) = LOWER($2))
    ORDER BY category, name
"#;

const INSERT_ITEM: &str = r#"
    INSERT INTO inventory_items (id, sku, name, category, unit, standard_quantity, min_quantity, unit_price, created_at)
    VALUES ($1, UPPER($2), $3, $4, $5, $6, $7, $8, NOW())
    RETURNING id, sku, name, category, unit, standard_quantity, min_quantity, unit_price, created_at
"#;

const UPDATE_ITEM: &str = r#"
    UPDATE inventory_items
    SET sku = COALESCE(UPPER($2), sku),
        name = COALESCE($3, name),
        category = COALESCE($4, category),
        unit = COALESCE($5, unit),
        standard_quantity = COALESCE($6, standard_quantity),
        min_quantity = COALESCE($7, min_quantity),
        unit_price = COALESCE($8, unit_price)
    WHERE id = $1
    RETURNING id, sku, name, category, unit, standard_quantity, min_quantity, unit_price, created_at
"#;

pub struct InventoryRepository {
    pool: PgPool,
}

impl InventoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<InventoryItem>, AppError> {
        let item = sqlx::query_as::<_, InventoryItem>(
            "SELECT id, sku, name, category, unit, standard_quantity, min_quantity, unit_price, created_at FROM inventory_items WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Catalog rows for the given ids, used to price order lines
    pub async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<InventoryItem>, AppError> {
        let items = sqlx::query_as::<_, InventoryItem>(
            "SELECT id, sku, name, category, unit, standard_quantity, min_quantity, unit_price, created_at FROM inventory_items WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    pub async fn list(
        &self,
        search_pattern: Option<&str>,
        category: Option<&str>,
    ) -> Result<Vec<InventoryItem>, AppError> {
        sqlx::query_as::<_, InventoryItem>(LIST_ITEMS)
            .bind(search_pattern)
            .bind(category)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("list inventory items", LIST_ITEMS))
    }

    pub async fn sku_exists(&self, sku: &str, except: Option<Uuid>) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM inventory_items WHERE UPPER(sku) = UPPER($1) AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(sku)
        .bind(except)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    pub async fn create(&self, request: &CreateInventoryItemRequest) -> Result<InventoryItem, AppError> {
        sqlx::query_as::<_, InventoryItem>(INSERT_ITEM)
            .bind(Uuid::new_v4())
            .bind(request.sku.trim())
            .bind(request.name.trim())
            .bind(request.category.trim())
            .bind(request.unit.as_deref().unwrap_or("each"))
            .bind(request.standard_quantity.unwrap_or(0))
            .bind(request.min_quantity.unwrap_or(0))
            .bind(request.unit_price.round_dp(2))
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("create inventory item", INSERT_ITEM))
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: &UpdateInventoryItemRequest,
    ) -> Result<Option<InventoryItem>, AppError> {
        sqlx::query_as::<_, InventoryItem>(UPDATE_ITEM)
            .bind(id)
            .bind(request.sku.as_deref().map(str::trim))
            .bind(request.name.as_deref().map(str::trim))
            .bind(request.category.as_deref().map(str::trim))
            .bind(request.unit.as_deref())
            .bind(request.standard_quantity)
            .bind(request.min_quantity)
            .bind(request.unit_price.map(|price| price.round_dp(2)))
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("update inventory item", UPDATE_ITEM))
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM inventory_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("delete inventory item", "DELETE FROM inventory_items WHERE id = $1"))?;

        Ok(result.rows_affected() > 0)
    }
}
