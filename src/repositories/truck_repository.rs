use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::truck::{Truck, TruckOverview, TruckStatus};
use crate::models::truck_bin::{TruckBin, TruckBinOverview};
use crate::repositories::db_error;
use crate::repositories::truck_bin_repository::LIST_BINS;
use crate::utils::errors::AppError;

const SELECT_TRUCK: &str = r#"
    SELECT id, truck_number, status, assigned_to, license_plate, mileage,
           last_maintenance_date, next_maintenance_date, created_at, updated_at
    FROM trucks
    WHERE id = $1
"#;

const OVERVIEW_SELECT: &str = r#"
    SELECT t.id, t.truck_number, t.status, t.assigned_to, u.name AS assigned_to_name,
           t.license_plate, t.mileage, t.last_maintenance_date, t.next_maintenance_date,
           (SELECT COUNT(*) FROM truck_bins b WHERE b.truck_id = t.id) AS bin_count,
           t.created_at, t.updated_at
    FROM trucks t
    LEFT JOIN users u ON u.id = t.assigned_to
"#;

const LIST_FILTER: &str = r#"
    WHERE ($1::text IS NULL OR t.status = $1)
      AND ($2::text IS NULL OR t.truck_number ILIKE $2 OR t.license_plate ILIKE $2 OR u.name ILIKE $2)
      AND ($3::uuid IS NULL OR t.assigned_to = $3)
"#;

const INSERT_TRUCK: &str = r#"
    INSERT INTO trucks (id, truck_number, status, assigned_to, license_plate, mileage,
                        last_maintenance_date, next_maintenance_date, created_at, updated_at)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW(), NOW())
    RETURNING id, truck_number, status, assigned_to, license_plate, mileage,
              last_maintenance_date, next_maintenance_date, created_at, updated_at
"#;

const UPDATE_TRUCK: &str = r#"
    UPDATE trucks
    SET truck_number = COALESCE($2, truck_number),
        status = COALESCE($3, status),
        assigned_to = CASE WHEN $4 THEN $5 ELSE assigned_to END,
        license_plate = COALESCE($6, license_plate),
        mileage = COALESCE($7, mileage),
        last_maintenance_date = COALESCE($8, last_maintenance_date),
        next_maintenance_date = COALESCE($9, next_maintenance_date),
        updated_at = NOW()
    WHERE id = $1
    RETURNING id, truck_number, status, assigned_to, license_plate, mileage,
              last_maintenance_date, next_maintenance_date, created_at, updated_at
"#;

const INSERT_BIN: &str = r#"
    INSERT INTO truck_bins (id, truck_id, bin_code, name, location, created_at)
    VALUES ($1, $2, $3, $4, $5, NOW())
    RETURNING id, truck_id, bin_code, name, location, created_at
"#;

/// Fields accepted by `TruckRepository::create`
#[derive(Debug)]
pub struct NewTruck {
    pub truck_number: String,
    pub status: TruckStatus,
    pub assigned_to: Option<Uuid>,
    pub license_plate: Option<String>,
    pub mileage: i32,
    pub last_maintenance_date: Option<NaiveDate>,
    pub next_maintenance_date: Option<NaiveDate>,
}

/// Partial update. `assigned_to: Some(None)` unassigns the truck.
#[derive(Debug, Default)]
pub struct TruckChanges {
    pub truck_number: Option<String>,
    pub status: Option<TruckStatus>,
    pub assigned_to: Option<Option<Uuid>>,
    pub license_plate: Option<String>,
    pub mileage: Option<i32>,
    pub last_maintenance_date: Option<NaiveDate>,
    pub next_maintenance_date: Option<NaiveDate>,
}

#[derive(Debug, Default)]
pub struct TruckQuery {
    pub status: Option<TruckStatus>,
    pub search_pattern: Option<String>,
    pub assigned_to: Option<Uuid>,
    pub limit: i64,
    pub offset: i64,
}

pub struct TruckRepository {
    pool: PgPool,
}

impl TruckRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Truck>, AppError> {
        sqlx::query_as::<_, Truck>(SELECT_TRUCK)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("find truck", SELECT_TRUCK))
    }

    pub async fn find_overview(&self, id: Uuid) -> Result<Option<TruckOverview>, AppError> {
        let sql = format!("{} WHERE t.id = $1", OVERVIEW_SELECT);
        sqlx::query_as::<_, TruckOverview>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("find truck overview", OVERVIEW_SELECT))
    }

    pub async fn list(&self, query: &TruckQuery) -> Result<(Vec<TruckOverview>, i64), AppError> {
        let status = query.status.map(|s| s.as_str());

        let sql = format!(
            "{} {} ORDER BY t.truck_number LIMIT $4 OFFSET $5",
            OVERVIEW_SELECT, LIST_FILTER
        );
        let trucks = sqlx::query_as::<_, TruckOverview>(&sql)
            .bind(status)
            .bind(query.search_pattern.as_deref())
            .bind(query.assigned_to)
            .bind(query.limit)
            .bind(query.offset)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("list trucks", LIST_FILTER))?;

        let count_sql = format!(
            "SELECT COUNT(*) FROM trucks t LEFT JOIN users u ON u.id = t.assigned_to {}",
            LIST_FILTER
        );
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(status)
            .bind(query.search_pattern.as_deref())
            .bind(query.assigned_to)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("count trucks", LIST_FILTER))?;

        Ok((trucks, total))
    }

    pub async fn create(&self, truck: NewTruck) -> Result<Truck, AppError> {
        sqlx::query_as::<_, Truck>(INSERT_TRUCK)
            .bind(Uuid::new_v4())
            .bind(truck.truck_number)
            .bind(truck.status.as_str())
            .bind(truck.assigned_to)
            .bind(truck.license_plate)
            .bind(truck.mileage)
            .bind(truck.last_maintenance_date)
            .bind(truck.next_maintenance_date)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("create truck", INSERT_TRUCK))
    }

    pub async fn update(&self, id: Uuid, changes: TruckChanges) -> Result<Option<Truck>, AppError> {
        let assignment_changed = changes.assigned_to.is_some();
        let assigned_to = changes.assigned_to.flatten();

        sqlx::query_as::<_, Truck>(UPDATE_TRUCK)
            .bind(id)
            .bind(changes.truck_number)
            .bind(changes.status.map(|s| s.as_str()))
            .bind(assignment_changed)
            .bind(assigned_to)
            .bind(changes.license_plate)
            .bind(changes.mileage)
            .bind(changes.last_maintenance_date)
            .bind(changes.next_maintenance_date)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("update truck", UPDATE_TRUCK))
    }

    pub async fn set_assignee(&self, id: Uuid, assignee: Option<Uuid>) -> Result<Option<Truck>, AppError> {
        self.update(
            id,
            TruckChanges {
                assigned_to: Some(assignee),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM trucks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("delete truck", "DELETE FROM trucks WHERE id = $1"))?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn truck_number_exists(&self, truck_number: &str, except: Option<Uuid>) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM trucks WHERE LOWER(truck_number) = LOWER($1) AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(truck_number)
        .bind(except)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    pub async fn list_bins(&self, truck_id: Uuid) -> Result<Vec<TruckBinOverview>, AppError> {
        sqlx::query_as::<_, TruckBinOverview>(LIST_BINS)
            .bind(truck_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("list bins", LIST_BINS))
    }

    pub async fn create_bin(
        &self,
        truck_id: Uuid,
        bin_code: String,
        name: String,
        location: Option<String>,
    ) -> Result<TruckBin, AppError> {
        sqlx::query_as::<_, TruckBin>(INSERT_BIN)
            .bind(Uuid::new_v4())
            .bind(truck_id)
            .bind(bin_code)
            .bind(name)
            .bind(location)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("create bin", INSERT_BIN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRUCK_COLUMNS: &str =
        "id, truck_number, status, assigned_to, license_plate, mileage, last_maintenance_date, next_maintenance_date, created_at, updated_at";

    #[test]
    fn column_list_matches_select() {
        for column in TRUCK_COLUMNS.split(", ") {
            assert!(SELECT_TRUCK.contains(column), "missing {}", column);
            assert!(INSERT_TRUCK.contains(column), "missing {}", column);
        }
    }
}
