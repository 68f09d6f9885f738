use sqlx::PgPool;

use crate::dto::common_dto::ApiResponse;
use crate::dto::dashboard_dto::DashboardResponse;
use crate::repositories::dashboard_repository::DashboardRepository;
use crate::services::dashboard_service::build_dashboard;
use crate::utils::errors::AppError;

pub struct DashboardController {
    repository: DashboardRepository,
}

impl DashboardController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: DashboardRepository::new(pool),
        }
    }

    pub async fn overview(&self) -> Result<ApiResponse<DashboardResponse>, AppError> {
        let counts = self.repository.counts().await?;
        Ok(ApiResponse::success(build_dashboard(&counts)))
    }
}
