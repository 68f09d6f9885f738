//! User model
//!
//! Maps the `users` table. Role and status are `TEXT` columns parsed into
//! `UserRole` / `UserStatus`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

text_enum! {
    /// System roles
    pub enum UserRole {
        Admin => "admin",
        Manager => "manager",
        Technician => "technician",
    }
}

text_enum! {
    /// Account lifecycle
    pub enum UserStatus {
        Active => "active",
        Inactive => "inactive",
        Pending => "pending",
        Suspended => "suspended",
    }
}

/// Row of the `users` table
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password_hash: String,
    pub role: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn role(&self) -> Option<UserRole> {
        UserRole::from_str(&self.role)
    }

    pub fn status(&self) -> Option<UserStatus> {
        UserStatus::from_str(&self.status)
    }

    pub fn is_active(&self) -> bool {
        self.status() == Some(UserStatus::Active)
    }

    /// Active account with the technician role
    pub fn is_active_technician(&self) -> bool {
        self.is_active() && self.role() == Some(UserRole::Technician)
    }
}

/// User row joined with the numbers of the trucks assigned to it
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserWithTrucks {
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
