//! `/api/technician/trucks/:id/bins/**`

use axum::{
    extract::{Path, State},
    routing::get,
    Extension, Json, Router,
};
use serde_json::Value;

use crate::controllers::bin_inventory_controller::BinInventoryController;
use crate::dto::bin_dto::{BinInventoryResponse, BinItemUpdateResponse, RemoveBinItemQuery, UpsertBinItemRequest};
use crate::dto::common_dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::truck_bin::{TruckBinOverview, TruckInventory};
use crate::repositories::truck_bin_repository::PgTruckBinStore;
use crate::routes::truck_routes::list_my_trucks;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{AppJson, AppQuery};
use crate::utils::validation::parse_uuid_param;

pub fn create_technician_router() -> Router<AppState> {
    Router::new()
        .route("/trucks", get(list_my_trucks))
        .route("/trucks/:id/bins", get(list_bins))
        .route(
            "/trucks/:id/bins/:bin_id",
            get(get_bin).post(upsert_bin_item).delete(remove_bin_item),
        )
}

fn controller(state: &AppState) -> BinInventoryController<PgTruckBinStore> {
    BinInventoryController::new(PgTruckBinStore::new(state.pool.clone()))
}

async fn list_bins(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(truck_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<TruckBinOverview>>>, AppError> {
    let truck_id = parse_uuid_param("truck id", &truck_id)?;
    Ok(Json(controller(&state).list_bins(&caller, truck_id).await?))
}

async fn get_bin(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path((truck_id, bin_id)): Path<(String, String)>,
) -> Result<Json<ApiResponse<BinInventoryResponse>>, AppError> {
    let truck_id = parse_uuid_param("truck id", &truck_id)?;
    let bin_id = parse_uuid_param("bin id", &bin_id)?;
    Ok(Json(controller(&state).get_bin(&caller, truck_id, bin_id).await?))
}

async fn upsert_bin_item(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path((truck_id, bin_id)): Path<(String, String)>,
    AppJson(body): AppJson<Value>,
) -> Result<Json<ApiResponse<BinItemUpdateResponse>>, AppError> {
    let truck_id = parse_uuid_param("truck id", &truck_id)?;
    let bin_id = parse_uuid_param("bin id", &bin_id)?;
    let request: UpsertBinItemRequest = serde_json::from_value(body)
        .map_err(|e| {
            tracing::debug!(error = %e, "bin item body rejected");
            AppError::BadRequest("Request body has missing or invalid fields".to_string())
        })?;

    Ok(Json(controller(&state).upsert_item(&caller, truck_id, bin_id, request).await?))
}

async fn remove_bin_item(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path((truck_id, bin_id)): Path<(String, String)>,
    AppQuery(query): AppQuery<RemoveBinItemQuery>,
) -> Result<Json<ApiResponse<TruckInventory>>, AppError> {
    let truck_id = parse_uuid_param("truck id", &truck_id)?;
    let bin_id = parse_uuid_param("bin id", &bin_id)?;
    Ok(Json(controller(&state).remove_item(&caller, truck_id, bin_id, query).await?))
}
