use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::common_dto::ApiResponse;
use crate::dto::supply_house_dto::{CreateSupplyHouseRequest, SupplyHouseFilters, UpdateSupplyHouseRequest};
use crate::models::supply_house::SupplyHouse;
use crate::repositories::supply_house_repository::SupplyHouseRepository;
use crate::utils::errors::{not_found_error, AppError};
use crate::utils::validation::like_pattern;

fn clean_specialties(specialties: Vec<String>) -> Vec<String> {
    let mut cleaned: Vec<String> = specialties
        .into_iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();
    cleaned.sort();
    cleaned.dedup();
    cleaned
}

pub struct SupplyHouseController {
    repository: SupplyHouseRepository,
}

impl SupplyHouseController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: SupplyHouseRepository::new(pool),
        }
    }

    /// `include_inactive` is honored for admins only
    pub async fn list(&self, filters: SupplyHouseFilters, admin: bool) -> Result<ApiResponse<Vec<SupplyHouse>>, AppError> {
        let include_inactive = admin && filters.include_inactive.unwrap_or(true);
        let pattern = filters.search.as_deref().map(like_pattern);
        let houses = self.repository.list(pattern.as_deref(), include_inactive).await?;
        Ok(ApiResponse::success(houses))
    }

    pub async fn create(&self, mut request: CreateSupplyHouseRequest) -> Result<ApiResponse<SupplyHouse>, AppError> {
        request.validate()?;
        request.specialties = clean_specialties(request.specialties);

        let house = self.repository.create(&request).await?;
        log::info!("🏬 Supply house {} created", house.name);
        Ok(ApiResponse::success_with_message(house, "Supply house created"))
    }

    pub async fn update(&self, id: Uuid, mut request: UpdateSupplyHouseRequest) -> Result<ApiResponse<SupplyHouse>, AppError> {
        request.validate()?;
        request.specialties = request.specialties.map(clean_specialties);

        let house = self
            .repository
            .update(id, &request)
            .await?
            .ok_or_else(|| not_found_error("Supply house", &id.to_string()))?;

        Ok(ApiResponse::success_with_message(house, "Supply house updated"))
    }

    pub async fn deactivate(&self, id: Uuid) -> Result<ApiResponse<()>, AppError> {
        if !self.repository.deactivate(id).await? {
            return Err(not_found_error("Supply house", &id.to_string()));
        }
        Ok(ApiResponse::message("Supply house deactivated"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn specialties_are_normalized() {
        let cleaned = clean_specialties(vec![" HVAC ".into(), "plumbing".into(), "hvac".into(), "".into()]);
        assert_eq!(cleaned, vec!["hvac".to_string(), "plumbing".to_string()]);
    }
}
