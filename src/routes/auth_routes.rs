use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    routing::post,
    Extension, Json, Router,
};

use crate::controllers::auth_controller::AuthController;
use crate::dto::auth_dto::{LoginRequest, LoginResponse};
use crate::dto::common_dto::ApiResponse;
use crate::dto::user_dto::UserResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::AppJson;
use crate::utils::jwt::{auth_cookie, clear_auth_cookie};

/// Routes reachable without a token
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

async fn login(
    State(state): State<AppState>,
    AppJson(request): AppJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let controller = AuthController::new(state.pool.clone());
    let response: LoginResponse = controller.login(request, &state.jwt_config()).await?;

    let cookie = auth_cookie(
        &state.config.auth_cookie_name,
        &response.token,
        response.expires_in,
        state.config.is_production(),
    );

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(ApiResponse::success_with_message(response, "Login successful")),
    ))
}

async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::SET_COOKIE, clear_auth_cookie(&state.config.auth_cookie_name))],
        Json(ApiResponse::message("Logged out")),
    )
}

pub async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let controller = AuthController::new(state.pool.clone());
    Ok(Json(controller.me(&user).await?))
}
