use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::common_dto::ApiResponse;
use crate::dto::inventory_dto::{CreateInventoryItemRequest, InventoryItemFilters, UpdateInventoryItemRequest};
use crate::models::inventory_item::InventoryItem;
use crate::repositories::inventory_repository::InventoryRepository;
use crate::repositories::{is_foreign_key_violation, is_unique_violation};
use crate::utils::errors::{conflict_error, not_found_error, AppError};
use crate::utils::validation::like_pattern;

pub struct InventoryController {
    repository: InventoryRepository,
}

impl InventoryController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: InventoryRepository::new(pool),
        }
    }

    pub async fn list(&self, filters: InventoryItemFilters) -> Result<ApiResponse<Vec<InventoryItem>>, AppError> {
        let pattern = filters.search.as_deref().map(like_pattern);
        let category = filters.category.as_deref().map(str::trim).filter(|c| !c.is_empty());
        let items = self.repository.list(pattern.as_deref(), category).await?;
        Ok(ApiResponse::success(items))
    }

    pub async fn create(&self, request: CreateInventoryItemRequest) -> Result<ApiResponse<InventoryItem>, AppError> {
        request.validate()?;
        if !request.has_valid_price() {
            return Err(AppError::BadRequest("unit_price cannot be negative".to_string()));
        }

        let sku = request.sku.trim().to_uppercase();
        if self.repository.sku_exists(&sku, None).await? {
            return Err(conflict_error("Inventory item", "SKU", &sku));
        }

        let item = self
            .repository
            .create(&request)
            .await
            .map_err(|e| if is_unique_violation(&e) { conflict_error("Inventory item", "SKU", &sku) } else { e })?;

        Ok(ApiResponse::success_with_message(item, "Inventory item created"))
    }

    pub async fn update(&self, id: Uuid, request: UpdateInventoryItemRequest) -> Result<ApiResponse<InventoryItem>, AppError> {
        request.validate()?;
        if !request.has_valid_price() {
            return Err(AppError::BadRequest("unit_price cannot be negative".to_string()));
        }

        if let Some(sku) = request.sku.as_deref() {
            if self.repository.sku_exists(sku.trim(), Some(id)).await? {
                return Err(conflict_error("Inventory item", "SKU", &sku.trim().to_uppercase()));
            }
        }

        let item = self
            .repository
            .update(id, &request)
            .await?
            .ok_or_else(|| not_found_error("Inventory item", &id.to_string()))?;

        Ok(ApiResponse::success_with_message(item, "Inventory item updated"))
    }

    pub async fn delete(&self, id: Uuid) -> Result<ApiResponse<()>, AppError> {
        let deleted = self.repository.delete(id).await.map_err(|e| {
            if is_foreign_key_violation(&e) {
                AppError::Conflict("Inventory item is referenced by orders".to_string())
            } else {
                e
            }
        })?;

        if !deleted {
            return Err(not_found_error("Inventory item", &id.to_string()));
        }
        Ok(ApiResponse::message("Inventory item deleted"))
    }
}
