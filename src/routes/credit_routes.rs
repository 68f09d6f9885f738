use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};

use crate::controllers::credit_controller::CreditController;
use crate::dto::common_dto::{ApiResponse, PaginatedResponse};
use crate::dto::credit_dto::{AdjustCreditRequest, CreditFilters, CreditLedgerResponse, RedeemCreditRequest};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::credit::Credit;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{AppJson, AppQuery};

/// `/api/credits`
pub fn create_credit_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_ledger))
        .route("/redeem", post(redeem))
}

/// `/api/admin/credits`
pub fn create_admin_credit_router() -> Router<AppState> {
    Router::new().route("/", get(list_credits).post(adjust_credit))
}

async fn get_ledger(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    AppQuery(filters): AppQuery<CreditFilters>,
) -> Result<Json<ApiResponse<CreditLedgerResponse>>, AppError> {
    let controller = CreditController::new(state.pool.clone());
    Ok(Json(controller.ledger(&caller, filters).await?))
}

async fn redeem(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    AppJson(request): AppJson<RedeemCreditRequest>,
) -> Result<Json<ApiResponse<Credit>>, AppError> {
    let controller = CreditController::new(state.pool.clone());
    Ok(Json(controller.redeem(&caller, request).await?))
}

async fn list_credits(
    State(state): State<AppState>,
    AppQuery(filters): AppQuery<CreditFilters>,
) -> Result<Json<PaginatedResponse<Credit>>, AppError> {
    let controller = CreditController::new(state.pool.clone());
    Ok(Json(controller.list(filters).await?))
}

async fn adjust_credit(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    AppJson(request): AppJson<AdjustCreditRequest>,
) -> Result<Json<ApiResponse<Credit>>, AppError> {
    let controller = CreditController::new(state.pool.clone());
    Ok(Json(controller.adjust(&caller, request).await?))
}
