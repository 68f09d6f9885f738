use sqlx::PgPool;
use uuid::Uuid;

use crate::models::user::{User, UserRole, UserStatus, UserWithTrucks};
use crate::repositories::db_error;
use crate::utils::errors::AppError;

const SELECT_USER: &str = r#"
    SELECT id, name, email, phone, password_hash, role, status, created_at, updated_at
    FROM users
    WHERE id = $1
"#;

const SELECT_USER_BY_EMAIL: &str = r#"
    SELECT id, name, email, phone, password_hash, role, status, created_at, updated_at
    FROM users
    WHERE LOWER(email) = LOWER($1)
"#;

const LIST_USERS: &str = r#"
    SELECT u.id, u.name, u.email, u.phone, u.role, u.status,
           COALESCE(
               ARRAY_AGG(t.truck_number ORDER BY t.truck_number) FILTER (WHERE t.id IS NOT NULL),
               '{}'
           ) AS assigned_trucks,
           u.created_at, u.updated_at
    FROM users u
    LEFT JOIN trucks t ON t.assigned_to = u.id
    WHERE ($1::text IS NULL OR u.name ILIKE $1 OR u.email ILIKE $1)
      AND ($2::text IS NULL OR u.role = $2)
      AND ($3::text IS NULL OR u.status = $3)
    GROUP BY u.id
    ORDER BY u.created_at DESC
    LIMIT $4 OFFSET $5
"#;

const COUNT_USERS: &str = r#"
    SELECT COUNT(*)
    FROM users u
    WHERE ($1::text IS NULL OR u.name ILIKE $1 OR u.email ILIKE $1)
      AND ($2::text IS NULL OR u.role = $2)
      AND ($3::text IS NULL OR u.status = $3)
"#;

const INSERT_USER: &str = r#"
    INSERT INTO users (id, name, email, phone, password_hash, role, status, created_at, updated_at)
    VALUES ($1, $2, $3, $4, $5, $6, $7, NOW(), NOW())
    RETURNING id, name, email, phone, password_hash, role, status, created_at, updated_at
"#;

const UPDATE_USER: &str = r#"
    UPDATE users
    SET name = COALESCE($2, name),
        email = COALESCE($3, email),
        phone = COALESCE($4, phone),
        password_hash = COALESCE($5, password_hash),
        role = COALESCE($6, role),
        status = COALESCE($7, status),
        updated_at = NOW()
    WHERE id = $1
    RETURNING id, name, email, phone, password_hash, role, status, created_at, updated_at
"#;

/// Fields accepted by `UserRepository::create`
#[derive(Debug)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password_hash: String,
    pub role: UserRole,
    pub status: UserStatus,
}

/// Partial update; `None` keeps the stored value
#[derive(Debug, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
}

/// Search parameters for the admin listing
#[derive(Debug, Default)]
pub struct UserQuery {
    pub search_pattern: Option<String>,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    pub limit: i64,
    pub offset: i64,
}

pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(SELECT_USER)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("find user", SELECT_USER))
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(SELECT_USER_BY_EMAIL)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("find user by email", SELECT_USER_BY_EMAIL))
    }

    pub async fn list(&self, query: &UserQuery) -> Result<(Vec<UserWithTrucks>, i64), AppError> {
        let role = query.role.map(|r| r.as_str());
        let status = query.status.map(|s| s.as_str());

        let users = sqlx::query_as::<_, UserWithTrucks>(LIST_USERS)
            .bind(query.search_pattern.as_deref())
            .bind(role)
            .bind(status)
            .bind(query.limit)
            .bind(query.offset)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("list users", LIST_USERS))?;

        let total: i64 = sqlx::query_scalar(COUNT_USERS)
            .bind(query.search_pattern.as_deref())
            .bind(role)
            .bind(status)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("count users", COUNT_USERS))?;

        Ok((users, total))
    }

    pub async fn create(&self, user: NewUser) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(INSERT_USER)
            .bind(Uuid::new_v4())
            .bind(user.name)
            .bind(user.email)
            .bind(user.phone)
            .bind(user.password_hash)
            .bind(user.role.as_str())
            .bind(user.status.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("create user", INSERT_USER))
    }

    pub async fn update(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(UPDATE_USER)
            .bind(id)
            .bind(changes.name)
            .bind(changes.email)
            .bind(changes.phone)
            .bind(changes.password_hash)
            .bind(changes.role.map(|r| r.as_str()))
            .bind(changes.status.map(|s| s.as_str()))
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("update user", UPDATE_USER))
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("delete user", "DELETE FROM users WHERE id = $1"))?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn email_exists(&self, email: &str, except: Option<Uuid>) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1) AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(email)
        .bind(except)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}
