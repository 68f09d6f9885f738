use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::supply_house_dto::{CreateSupplyHouseRequest, UpdateSupplyHouseRequest};
use crate::models::supply_house::SupplyHouse;
use crate::repositories::db_error;
use crate::utils::errors::AppError;

const SELECT_HOUSE: &str = r#"
    SELECT id, name, contact_name, email, phone, address, specialties, is_active, created_at, updated_at
    FROM supply_houses
    WHERE id = $1
"#;

const LIST_HOUSES: &str = r#"
    SELECT id, name, contact_name, email, phone, address, specialties, is_active, created_at, updated_at
    FROM supply_houses
    WHERE ($1 OR is_active)
      AND ($2::text IS NULL OR name ILIKE $2 OR contact_name ILIKE $2 OR array_to_string(specialties, ' ') ILIKE $2)
    ORDER BY name
"#;

const INSERT_HOUSE: &str = r#"
    INSERT INTO supply_houses (id, name, contact_name, email, phone, address, specialties, is_active, created_at, updated_at)
    VALUES ($1, $2, $3, $4, $5, $6, $7, TRUE, NOW(), NOW())
    RETURNING id, name, contact_name, email, phone, address, specialties, is_active, created_at, updated_at
"#;

const UPDATE_HOUSE: &str = r#"
    UPDATE supply_houses
    SET name = COALESCE($2, name),
        contact_name = COALESCE($3, contact_name),
        email = COALESCE($4, email),
        phone = COALESCE($5, phone),
        address = COALESCE($6, address),
        specialties = COALESCE($7, specialties),
        is_active = COALESCE($8, is_active),
        updated_at = NOW()
    WHERE id = $1
    RETURNING id, name, contact_name, email, phone, address, specialties, is_active, created_at, updated_at
"#;

pub struct SupplyHouseRepository {
    pool: PgPool,
}

impl SupplyHouseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<SupplyHouse>, AppError> {
        sqlx::query_as::<_, SupplyHouse>(SELECT_HOUSE)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("find supply house", SELECT_HOUSE))
    }

    pub async fn list(&self, search_pattern: Option<&str>, include_inactive: bool) -> Result<Vec<SupplyHouse>, AppError> {
        sqlx::query_as::<_, SupplyHouse>(LIST_HOUSES)
            .bind(include_inactive)
            .bind(search_pattern)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("list supply houses", LIST_HOUSES))
    }

    pub async fn create(&self, request: &CreateSupplyHouseRequest) -> Result<SupplyHouse, AppError> {
        sqlx::query_as::<_, SupplyHouse>(INSERT_HOUSE)
            .bind(Uuid::new_v4())
            .bind(request.name.trim())
            .bind(request.contact_name.as_deref())
            .bind(request.email.as_deref())
            .bind(request.phone.as_deref())
            .bind(request.address.as_deref())
            .bind(&request.specialties)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("create supply house", INSERT_HOUSE))
    }

    pub async fn update(&self, id: Uuid, request: &UpdateSupplyHouseRequest) -> Result<Option<SupplyHouse>, AppError> {
        sqlx::query_as::<_, SupplyHouse>(UPDATE_HOUSE)
            .bind(id)
            .bind(request.name.as_deref().map(str::trim))
            .bind(request.contact_name.as_deref())
            .bind(request.email.as_deref())
            .bind(request.phone.as_deref())
            .bind(request.address.as_deref())
            .bind(request.specialties.as_ref())
            .bind(request.is_active)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("update supply house", UPDATE_HOUSE))
    }

    /// Soft delete; orders keep pointing at the row
    pub async fn deactivate(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE supply_houses SET is_active = FALSE, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
