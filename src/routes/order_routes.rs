use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    routing::{get, patch, post},
    Extension, Json, Router,
};

use crate::controllers::order_controller::OrderController;
use crate::dto::common_dto::{ApiResponse, PaginatedResponse};
use crate::dto::order_dto::{
    CreateOrderRequest, OrderConfirmationResponse, OrderDetailResponse, OrderFilters, UpdateOrderStatusRequest,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::order::{Order, OrderOverview};
use crate::routes::parse_id;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{AppJson, AppQuery};

/// `/api/orders`
pub fn create_order_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route("/:id", get(get_order))
}

/// `/api/admin/orders`
pub fn create_admin_order_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders))
        .route("/:id", get(get_order))
        .route("/:id/confirm", post(confirm_order))
        .route("/:id/status", patch(update_order_status))
}

async fn list_orders(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    AppQuery(filters): AppQuery<OrderFilters>,
) -> Result<Json<PaginatedResponse<OrderOverview>>, AppError> {
    let controller = OrderController::new(state.pool.clone());
    Ok(Json(controller.list(&caller, filters).await?))
}

async fn get_order(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<OrderDetailResponse>>, AppError> {
    let controller = OrderController::new(state.pool.clone());
    Ok(Json(controller.get(&caller, parse_id(&id)?).await?))
}

async fn create_order(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    AppJson(request): AppJson<CreateOrderRequest>,
) -> Result<Json<ApiResponse<OrderDetailResponse>>, AppError> {
    let controller = OrderController::new(state.pool.clone());
    Ok(Json(controller.create(&caller, request).await?))
}

async fn confirm_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<OrderConfirmationResponse>>, AppError> {
    let controller = OrderController::new(state.pool.clone());
    Ok(Json(controller.confirm(parse_id(&id)?).await?))
}

async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(request): AppJson<UpdateOrderStatusRequest>,
) -> Result<Json<ApiResponse<Order>>, AppError> {
    let controller = OrderController::new(state.pool.clone());
    Ok(Json(controller.update_status(parse_id(&id)?, request).await?))
}

/// `GET /api/invoice/:id`
pub async fn get_invoice(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let controller = OrderController::new(state.pool.clone());
    let invoice = controller.invoice(&caller, parse_id(&id)?).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{}\"", invoice.filename),
            ),
        ],
        invoice.bytes,
    ))
}
