use bcrypt::verify;
use sqlx::PgPool;
use validator::Validate;

use crate::dto::auth_dto::{LoginRequest, LoginResponse};
use crate::dto::common_dto::ApiResponse;
use crate::dto::user_dto::UserResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::repositories::user_repository::UserRepository;
use crate::utils::errors::AppError;
use crate::utils::jwt::{generate_token, JwtConfig};

pub struct AuthController {
    repository: UserRepository,
}

impl AuthController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: UserRepository::new(pool),
        }
    }

    pub async fn login(&self, request: LoginRequest, jwt: &JwtConfig) -> Result<LoginResponse, AppError> {
        request.validate()?;

        let user = self
            .repository
            .find_by_email(request.email.trim())
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))?;

        let password_valid = verify(&request.password, &user.password_hash)
            .map_err(|e| AppError::Hash(format!("Error verifying password: {}", e)))?;

        if !password_valid {
            log::warn!("🔒 Failed login for {}", user.email);
            return Err(AppError::Unauthorized("Invalid email or password".to_string()));
        }

        if !user.is_active() {
            return Err(AppError::Unauthorized("User account is not active".to_string()));
        }

        let role = user
            .role()
            .ok_or_else(|| AppError::Internal(format!("User {} has unknown role '{}'", user.id, user.role)))?;

        let token = generate_token(user.id, &user.email, role, jwt)?;
        log::info!("🔑 {} logged in as {}", user.email, role);

        Ok(LoginResponse {
            token,
            expires_in: jwt.expiration,
            user: UserResponse::from(user),
        })
    }

    pub async fn me(&self, caller: &AuthenticatedUser) -> Result<ApiResponse<UserResponse>, AppError> {
        let user = self
            .repository
            .find_by_id(caller.user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;

        Ok(ApiResponse::success(UserResponse::from(user)))
    }
}
