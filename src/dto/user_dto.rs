use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::dto::common_dto::{PageRequest, PaginationQuery};
use crate::models::user::{User, UserRole, UserStatus, UserWithTrucks};
use crate::utils::validation::validate_phone;

// Request to create a user
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[validate(custom = "validate_phone")]
    pub phone: Option<String>,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    pub role: UserRole,

    pub status: Option<UserStatus>,
}

// Request to update a user
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(custom = "validate_phone")]
    pub phone: Option<String>,

    #[validate(length(min = 8, max = 128))]
    pub password: Option<String>,

    pub role: Option<UserRole>,

    pub status: Option<UserStatus>,
}

// `GET /api/admin/users` filters
#[derive(Debug, Default, Deserialize)]
pub struct UserFilters {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
}

impl UserFilters {
    pub fn page_request(&self) -> PageRequest {
        PaginationQuery {
            page: self.page,
            limit: self.limit,
        }
        .resolve()
    }
}

// User without credentials
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: String,
    pub status: String,
    pub assigned_trucks: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            role: user.role,
            status: user.status,
            assigned_trucks: Vec::new(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<UserWithTrucks> for UserResponse {
    fn from(user: UserWithTrucks) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            role: user.role,
            status: user.status,
            assigned_trucks: user.assigned_trucks,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_request_validation() {
        let request: CreateUserRequest = serde_json::from_value(json!({
            "name": "Dana Tech",
            "email": "dana@truxtok.com",
            "phone": "(555) 123-4567",
            "password": "s3cure-pass",
            "role": "technician"
        }))
        .unwrap();
        assert!(request.validate().is_ok());

        let request: CreateUserRequest = serde_json::from_value(json!({
            "name": "D",
            "email": "not-an-email",
            "password": "short",
            "role": "manager"
        }))
        .unwrap();
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn unknown_role_is_rejected_at_parse_time() {
        let parsed = serde_json::from_value::<CreateUserRequest>(json!({
            "name": "Dana",
            "email": "dana@truxtok.com",
            "password": "long-enough",
            "role": "superuser"
        }));
        assert!(parsed.is_err());
    }
}
