//! Supply houses and the inventory catalog

use axum::{
    extract::{Path, State},
    routing::{get, patch},
    Extension, Json, Router,
};

use crate::controllers::inventory_controller::InventoryController;
use crate::controllers::supply_house_controller::SupplyHouseController;
use crate::dto::common_dto::ApiResponse;
use crate::dto::inventory_dto::{CreateInventoryItemRequest, InventoryItemFilters, UpdateInventoryItemRequest};
use crate::dto::supply_house_dto::{CreateSupplyHouseRequest, SupplyHouseFilters, UpdateSupplyHouseRequest};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::inventory_item::InventoryItem;
use crate::models::supply_house::SupplyHouse;
use crate::routes::parse_id;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{AppJson, AppQuery};

/// `/api/admin/supply-houses`
pub fn create_admin_supply_house_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_supply_houses).post(create_supply_house))
        .route("/:id", patch(update_supply_house).delete(deactivate_supply_house))
}

/// `/api/admin/inventory-items`
pub fn create_admin_inventory_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_inventory_items).post(create_inventory_item))
        .route("/:id", patch(update_inventory_item).delete(delete_inventory_item))
}

/// `GET /api/supply-houses` and `GET /api/admin/supply-houses`
pub async fn list_supply_houses(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    AppQuery(filters): AppQuery<SupplyHouseFilters>,
) -> Result<Json<ApiResponse<Vec<SupplyHouse>>>, AppError> {
    let controller = SupplyHouseController::new(state.pool.clone());
    Ok(Json(controller.list(filters, caller.is_admin()).await?))
}

async fn create_supply_house(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateSupplyHouseRequest>,
) -> Result<Json<ApiResponse<SupplyHouse>>, AppError> {
    let controller = SupplyHouseController::new(state.pool.clone());
    Ok(Json(controller.create(request).await?))
}

async fn update_supply_house(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(request): AppJson<UpdateSupplyHouseRequest>,
) -> Result<Json<ApiResponse<SupplyHouse>>, AppError> {
    let controller = SupplyHouseController::new(state.pool.clone());
    Ok(Json(controller.update(parse_id(&id)?, request).await?))
}

async fn deactivate_supply_house(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = SupplyHouseController::new(state.pool.clone());
    Ok(Json(controller.deactivate(parse_id(&id)?).await?))
}

/// `GET /api/inventory-items` and `GET /api/admin/inventory-items`
pub async fn list_inventory_items(
    State(state): State<AppState>,
    AppQuery(filters): AppQuery<InventoryItemFilters>,
) -> Result<Json<ApiResponse<Vec<InventoryItem>>>, AppError> {
    let controller = InventoryController::new(state.pool.clone());
    Ok(Json(controller.list(filters).await?))
}

async fn create_inventory_item(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateInventoryItemRequest>,
) -> Result<Json<ApiResponse<InventoryItem>>, AppError> {
    let controller = InventoryController::new(state.pool.clone());
    Ok(Json(controller.create(request).await?))
}

async fn update_inventory_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(request): AppJson<UpdateInventoryItemRequest>,
) -> Result<Json<ApiResponse<InventoryItem>>, AppError> {
    let controller = InventoryController::new(state.pool.clone());
    Ok(Json(controller.update(parse_id(&id)?, request).await?))
}

async fn delete_inventory_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = InventoryController::new(state.pool.clone());
    Ok(Json(controller.delete(parse_id(&id)?).await?))
}
