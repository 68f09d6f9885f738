use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use crate::controllers::dashboard_controller::DashboardController;
use crate::controllers::settings_controller::SettingsController;
use crate::dto::common_dto::ApiResponse;
use crate::dto::dashboard_dto::DashboardResponse;
use crate::dto::settings_dto::{SettingsDocument, SettingsImportRequest};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::AppJson;

/// `/api/admin/settings`
pub fn create_settings_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_settings).post(import_settings))
        .route("/export", get(export_settings))
}

async fn get_settings(State(state): State<AppState>) -> Result<Json<ApiResponse<SettingsDocument>>, AppError> {
    let controller = SettingsController::new(state.pool.clone());
    Ok(Json(controller.get().await?))
}

async fn import_settings(
    State(state): State<AppState>,
    AppJson(request): AppJson<SettingsImportRequest>,
) -> Result<Json<ApiResponse<SettingsDocument>>, AppError> {
    let controller = SettingsController::new(state.pool.clone());
    Ok(Json(controller.import(request).await?))
}

/// Bare document, served as a download
async fn export_settings(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let controller = SettingsController::new(state.pool.clone());
    let document = controller.document().await?;

    Ok((
        [(
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"truxtok-settings.json\"",
        )],
        Json(document),
    ))
}

/// `GET /api/admin/dashboard`
pub async fn get_dashboard(State(state): State<AppState>) -> Result<Json<ApiResponse<DashboardResponse>>, AppError> {
    let controller = DashboardController::new(state.pool.clone());
    Ok(Json(controller.overview().await?))
}
