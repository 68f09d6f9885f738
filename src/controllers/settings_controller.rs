use sqlx::PgPool;

use crate::dto::common_dto::ApiResponse;
use crate::dto::settings_dto::{SettingsDocument, SettingsImportRequest};
use crate::repositories::settings_repository::SettingsRepository;
use crate::services::settings_service::{document_from_rows, entries_from_import};
use crate::utils::errors::AppError;

pub struct SettingsController {
    repository: SettingsRepository,
}

impl SettingsController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: SettingsRepository::new(pool),
        }
    }

    pub async fn document(&self) -> Result<SettingsDocument, AppError> {
        let rows = self.repository.all().await?;
        Ok(document_from_rows(&rows))
    }

    pub async fn get(&self) -> Result<ApiResponse<SettingsDocument>, AppError> {
        Ok(ApiResponse::success(self.document().await?))
    }

    /// Stores every key of the document in one transaction and returns the
    /// resulting settings
    pub async fn import(&self, request: SettingsImportRequest) -> Result<ApiResponse<SettingsDocument>, AppError> {
        let entries = entries_from_import(&request)?;
        if entries.is_empty() {
            return Err(AppError::BadRequest("No settings to import".to_string()));
        }

        let written = self.repository.upsert_all(&entries).await?;
        let document = self.document().await?;

        Ok(ApiResponse::success_with_message(
            document,
            format!("{} settings saved", written),
        ))
    }
}
