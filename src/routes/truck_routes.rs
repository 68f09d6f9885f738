use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};

use crate::controllers::truck_controller::TruckController;
use crate::dto::common_dto::{ApiResponse, PaginatedResponse};
use crate::dto::truck_dto::{
    AssignTruckRequest, CreateBinRequest, CreateTruckRequest, TruckDetailResponse, TruckFilters, UpdateTruckRequest,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::truck::{Truck, TruckOverview};
use crate::models::truck_bin::{TruckBin, TruckBinOverview};
use crate::routes::parse_id;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{AppJson, AppQuery};

/// `/api/admin/trucks`
pub fn create_truck_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_trucks).post(create_truck))
        .route("/:id", get(get_truck).patch(update_truck).delete(delete_truck))
        .route("/:id/assign", post(assign_truck))
        .route("/:id/bins", get(list_bins).post(create_bin))
}

async fn list_trucks(
    State(state): State<AppState>,
    AppQuery(filters): AppQuery<TruckFilters>,
) -> Result<Json<PaginatedResponse<TruckOverview>>, AppError> {
    let controller = TruckController::new(state.pool.clone());
    Ok(Json(controller.list(filters).await?))
}

/// `GET /api/technician/trucks`
pub async fn list_my_trucks(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    AppQuery(filters): AppQuery<TruckFilters>,
) -> Result<Json<PaginatedResponse<TruckOverview>>, AppError> {
    let controller = TruckController::new(state.pool.clone());
    Ok(Json(controller.list_for_caller(&caller, filters).await?))
}

async fn get_truck(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<TruckDetailResponse>>, AppError> {
    let controller = TruckController::new(state.pool.clone());
    Ok(Json(controller.get(parse_id(&id)?).await?))
}

async fn create_truck(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateTruckRequest>,
) -> Result<Json<ApiResponse<Truck>>, AppError> {
    let controller = TruckController::new(state.pool.clone());
    Ok(Json(controller.create(request).await?))
}

async fn update_truck(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(request): AppJson<UpdateTruckRequest>,
) -> Result<Json<ApiResponse<Truck>>, AppError> {
    let controller = TruckController::new(state.pool.clone());
    Ok(Json(controller.update(parse_id(&id)?, request).await?))
}

async fn delete_truck(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = TruckController::new(state.pool.clone());
    Ok(Json(controller.delete(parse_id(&id)?).await?))
}

async fn assign_truck(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(request): AppJson<AssignTruckRequest>,
) -> Result<Json<ApiResponse<Truck>>, AppError> {
    let controller = TruckController::new(state.pool.clone());
    Ok(Json(controller.assign(parse_id(&id)?, request).await?))
}

async fn list_bins(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<TruckBinOverview>>>, AppError> {
    let controller = TruckController::new(state.pool.clone());
    Ok(Json(controller.list_bins(parse_id(&id)?).await?))
}

async fn create_bin(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(request): AppJson<CreateBinRequest>,
) -> Result<Json<ApiResponse<TruckBin>>, AppError> {
    let controller = TruckController::new(state.pool.clone());
    Ok(Json(controller.create_bin(parse_id(&id)?, request).await?))
}
