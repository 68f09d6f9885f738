//! JWT authentication middleware
//!
//! Resolves the bearer token (or the auth cookie) to an active user and
//! injects an `AuthenticatedUser` into the request extensions.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
    Extension,
};
use uuid::Uuid;

use crate::{
    models::user::UserRole,
    repositories::user_repository::UserRepository,
    state::AppState,
    utils::{
        errors::AppError,
        jwt::{token_from_request, verify_token},
    },
};

/// Authenticated user injected into requests
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    pub role: UserRole,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Admins and managers can read every technician's records
    pub fn can_view_all(&self) -> bool {
        matches!(self.role, UserRole::Admin | UserRole::Manager)
    }
}

/// JWT authentication middleware
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = token_from_request(request.headers(), &state.config.auth_cookie_name)?.to_owned();

    let claims = verify_token(&token, &state.jwt_config())?;

    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::Unauthorized("Invalid user id in token".to_string()))?;

    // The user row is re-read so deactivated accounts lose access immediately
    let user = UserRepository::new(state.pool.clone())
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;

    if !user.is_active() {
        return Err(AppError::Unauthorized("User account is not active".to_string()));
    }

    let role = user
        .role()
        .ok_or_else(|| AppError::Unauthorized(format!("Unknown role '{}'", user.role)))?;

    tracing::debug!(user_id = %user.id, role = %role, "request authenticated");

    request.extensions_mut().insert(AuthenticatedUser {
        user_id: user.id,
        email: user.email,
        name: user.name,
        role,
    });

    Ok(next.run(request).await)
}

/// Only admins may pass
pub async fn admin_only_middleware(
    Extension(user): Extension<AuthenticatedUser>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !user.is_admin() {
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }

    Ok(next.run(request).await)
}
