use bcrypt::{hash, DEFAULT_COST};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::common_dto::{ApiResponse, PaginatedResponse};
use crate::dto::user_dto::{CreateUserRequest, UpdateUserRequest, UserFilters, UserResponse};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::user::UserStatus;
use crate::repositories::user_repository::{NewUser, UserChanges, UserQuery, UserRepository};
use crate::repositories::{is_foreign_key_violation, is_unique_violation};
use crate::utils::errors::{conflict_error, not_found_error, AppError};
use crate::utils::validation::like_pattern;

fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST).map_err(|e| AppError::Hash(format!("Error hashing password: {}", e)))
}

pub struct UserController {
    repository: UserRepository,
}

impl UserController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: UserRepository::new(pool),
        }
    }

    pub async fn list(&self, filters: UserFilters) -> Result<PaginatedResponse<UserResponse>, AppError> {
        let page = filters.page_request();
        let query = UserQuery {
            search_pattern: filters.search.as_deref().map(like_pattern),
            role: filters.role,
            status: filters.status,
            limit: page.limit,
            offset: page.offset(),
        };

        let (users, total) = self.repository.list(&query).await?;
        let users = users.into_iter().map(UserResponse::from).collect();

        Ok(PaginatedResponse::new(users, page, total))
    }

    pub async fn get(&self, id: Uuid) -> Result<ApiResponse<UserResponse>, AppError> {
        let user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("User", &id.to_string()))?;

        Ok(ApiResponse::success(UserResponse::from(user)))
    }

    pub async fn create(&self, request: CreateUserRequest) -> Result<ApiResponse<UserResponse>, AppError> {
        request.validate()?;

        let email = request.email.trim().to_lowercase();
        if self.repository.email_exists(&email, None).await? {
            return Err(conflict_error("User", "email", &email));
        }

        let user = self
            .repository
            .create(NewUser {
                name: request.name.trim().to_string(),
                email: email.clone(),
                phone: request.phone,
                password_hash: hash_password(&request.password)?,
                role: request.role,
                status: request.status.unwrap_or(UserStatus::Active),
            })
            .await
            .map_err(|e| if is_unique_violation(&e) { conflict_error("User", "email", &email) } else { e })?;

        log::info!("👤 User {} created ({})", user.email, user.role);
        Ok(ApiResponse::success_with_message(UserResponse::from(user), "User created"))
    }

    pub async fn update(&self, id: Uuid, request: UpdateUserRequest) -> Result<ApiResponse<UserResponse>, AppError> {
        request.validate()?;

        let email = request.email.as_deref().map(|e| e.trim().to_lowercase());
        if let Some(email) = &email {
            if self.repository.email_exists(email, Some(id)).await? {
                return Err(conflict_error("User", "email", email));
            }
        }

        let password_hash = match request.password.as_deref() {
            Some(password) => Some(hash_password(password)?),
            None => None,
        };

        let changes = UserChanges {
            name: request.name.map(|n| n.trim().to_string()),
            email,
            phone: request.phone,
            password_hash,
            role: request.role,
            status: request.status,
        };

        let user = self
            .repository
            .update(id, changes)
            .await?
            .ok_or_else(|| not_found_error("User", &id.to_string()))?;

        Ok(ApiResponse::success_with_message(UserResponse::from(user), "User updated"))
    }

    pub async fn delete(&self, caller: &AuthenticatedUser, id: Uuid) -> Result<ApiResponse<()>, AppError> {
        if caller.user_id == id {
            return Err(AppError::BadRequest("You cannot delete your own account".to_string()));
        }

        let deleted = self.repository.delete(id).await.map_err(|e| {
            if is_foreign_key_violation(&e) {
                AppError::Conflict("User has orders and cannot be deleted; suspend it instead".to_string())
            } else {
                e
            }
        })?;

        if !deleted {
            return Err(not_found_error("User", &id.to_string()));
        }

        log::info!("🗑️ User {} deleted by {}", id, caller.email);
        Ok(ApiResponse::message("User deleted"))
    }
}
