use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::common_dto::{ApiResponse, PaginatedResponse};
use crate::dto::truck_dto::{
    AssignTruckRequest, CreateBinRequest, CreateTruckRequest, TruckDetailResponse, TruckFilters, UpdateTruckRequest,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::truck::{Truck, TruckOverview, TruckStatus};
use crate::models::truck_bin::{TruckBin, TruckBinOverview};
use crate::repositories::is_unique_violation;
use crate::repositories::truck_repository::{NewTruck, TruckChanges, TruckQuery, TruckRepository};
use crate::repositories::user_repository::UserRepository;
use crate::services::access_service::technician_scope;
use crate::utils::errors::{conflict_error, not_found_error, AppError};
use crate::utils::validation::like_pattern;

pub struct TruckController {
    repository: TruckRepository,
    users: UserRepository,
}

impl TruckController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: TruckRepository::new(pool.clone()),
            users: UserRepository::new(pool),
        }
    }

    /// Assignees must be active technicians
    async fn ensure_assignable(&self, technician_id: Uuid) -> Result<(), AppError> {
        let user = self
            .users
            .find_by_id(technician_id)
            .await?
            .ok_or_else(|| AppError::BadRequest(format!("User {} does not exist", technician_id)))?;

        if !user.is_active_technician() {
            return Err(AppError::BadRequest(format!(
                "User {} is not an active technician",
                technician_id
            )));
        }
        Ok(())
    }

    async fn find_truck(&self, id: Uuid) -> Result<Truck, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Truck", &id.to_string()))
    }

    pub async fn list(&self, filters: TruckFilters) -> Result<PaginatedResponse<TruckOverview>, AppError> {
        let page = filters.page_request();
        let query = TruckQuery {
            status: filters.status,
            search_pattern: filters.search.as_deref().map(like_pattern),
            assigned_to: None,
            limit: page.limit,
            offset: page.offset(),
        };

        let (trucks, total) = self.repository.list(&query).await?;
        Ok(PaginatedResponse::new(trucks, page, total))
    }

    /// Technicians see their own trucks, admins and managers the whole fleet
    pub async fn list_for_caller(
        &self,
        caller: &AuthenticatedUser,
        filters: TruckFilters,
    ) -> Result<PaginatedResponse<TruckOverview>, AppError> {
        let page = filters.page_request();
        let query = TruckQuery {
            status: filters.status,
            search_pattern: filters.search.as_deref().map(like_pattern),
            assigned_to: technician_scope(caller, None)?,
            limit: page.limit,
            offset: page.offset(),
        };

        let (trucks, total) = self.repository.list(&query).await?;
        Ok(PaginatedResponse::new(trucks, page, total))
    }

    pub async fn get(&self, id: Uuid) -> Result<ApiResponse<TruckDetailResponse>, AppError> {
        let truck = self
            .repository
            .find_overview(id)
            .await?
            .ok_or_else(|| not_found_error("Truck", &id.to_string()))?;
        let bins = self.repository.list_bins(id).await?;

        Ok(ApiResponse::success(TruckDetailResponse { truck, bins }))
    }

    pub async fn create(&self, request: CreateTruckRequest) -> Result<ApiResponse<Truck>, AppError> {
        request.validate()?;

        let truck_number = request.truck_number.trim().to_uppercase();
        if self.repository.truck_number_exists(&truck_number, None).await? {
            return Err(conflict_error("Truck", "number", &truck_number));
        }
        if let Some(technician_id) = request.assigned_to {
            self.ensure_assignable(technician_id).await?;
        }

        let truck = self
            .repository
            .create(NewTruck {
                truck_number: truck_number.clone(),
                status: request.status.unwrap_or(TruckStatus::Active),
                assigned_to: request.assigned_to,
                license_plate: request.license_plate,
                mileage: request.mileage.unwrap_or(0),
                last_maintenance_date: request.last_maintenance_date,
                next_maintenance_date: request.next_maintenance_date,
            })
            .await
            .map_err(|e| if is_unique_violation(&e) { conflict_error("Truck", "number", &truck_number) } else { e })?;

        log::info!("🚚 Truck {} created", truck.truck_number);
        Ok(ApiResponse::success_with_message(truck, "Truck created"))
    }

    pub async fn update(&self, id: Uuid, request: UpdateTruckRequest) -> Result<ApiResponse<Truck>, AppError> {
        request.validate()?;

        let truck_number = request.truck_number.as_deref().map(|n| n.trim().to_uppercase());
        if let Some(number) = &truck_number {
            if self.repository.truck_number_exists(number, Some(id)).await? {
                return Err(conflict_error("Truck", "number", number));
            }
        }
        if let Some(Some(technician_id)) = request.assigned_to {
            self.ensure_assignable(technician_id).await?;
        }

        let changes = TruckChanges {
            truck_number,
            status: request.status,
            assigned_to: request.assigned_to,
            license_plate: request.license_plate,
            mileage: request.mileage,
            last_maintenance_date: request.last_maintenance_date,
            next_maintenance_date: request.next_maintenance_date,
        };

        let truck = self
            .repository
            .update(id, changes)
            .await?
            .ok_or_else(|| not_found_error("Truck", &id.to_string()))?;

        Ok(ApiResponse::success_with_message(truck, "Truck updated"))
    }

    pub async fn assign(&self, id: Uuid, request: AssignTruckRequest) -> Result<ApiResponse<Truck>, AppError> {
        if let Some(technician_id) = request.technician_id {
            self.ensure_assignable(technician_id).await?;
        }

        let truck = self
            .repository
            .set_assignee(id, request.technician_id)
            .await?
            .ok_or_else(|| not_found_error("Truck", &id.to_string()))?;

        let message = match truck.assigned_to {
            Some(technician_id) => {
                log::info!("🚚 Truck {} assigned to {}", truck.truck_number, technician_id);
                "Truck assigned"
            }
            None => {
                log::info!("🚚 Truck {} unassigned", truck.truck_number);
                "Truck unassigned"
            }
        };
        Ok(ApiResponse::success_with_message(truck, message))
    }

    pub async fn delete(&self, id: Uuid) -> Result<ApiResponse<()>, AppError> {
        let deleted = self.repository.delete(id).await.map_err(|e| {
            if crate::repositories::is_foreign_key_violation(&e) {
                AppError::Conflict("Truck has orders and cannot be deleted".to_string())
            } else {
                e
            }
        })?;

        if !deleted {
            return Err(not_found_error("Truck", &id.to_string()));
        }
        Ok(ApiResponse::message("Truck deleted"))
    }

    pub async fn list_bins(&self, truck_id: Uuid) -> Result<ApiResponse<Vec<TruckBinOverview>>, AppError> {
        self.find_truck(truck_id).await?;
        let bins = self.repository.list_bins(truck_id).await?;
        Ok(ApiResponse::success(bins))
    }

    pub async fn create_bin(&self, truck_id: Uuid, request: CreateBinRequest) -> Result<ApiResponse<TruckBin>, AppError> {
        request.validate()?;
        self.find_truck(truck_id).await?;

        let bin_code = request.bin_code.trim().to_uppercase();
        let bin = self
            .repository
            .create_bin(truck_id, bin_code.clone(), request.name.trim().to_string(), request.location)
            .await
            .map_err(|e| if is_unique_violation(&e) { conflict_error("Bin", "code", &bin_code) } else { e })?;

        Ok(ApiResponse::success_with_message(bin, "Bin created"))
    }
}
