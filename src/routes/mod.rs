//! HTTP routing
//!
//! `create_app` assembles every resource router under `/api`, wraps the
//! protected part in the JWT middleware and the admin part in the role guard.

pub mod auth_routes;
pub mod bin_routes;
pub mod catalog_routes;
pub mod credit_routes;
pub mod order_routes;
pub mod settings_routes;
pub mod truck_routes;
pub mod user_routes;

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use uuid::Uuid;

use crate::config::database;
use crate::middleware::auth::{admin_only_middleware, auth_middleware};
use crate::middleware::cors::cors_middleware;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::validation::parse_uuid_param;

/// Parses an `:id` path segment into a UUID, answering 400 otherwise
pub(crate) fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    parse_uuid_param("id", raw)
}

/// Builds the application router
pub fn create_app(state: AppState) -> Router {
    let admin = Router::new()
        .nest("/users", user_routes::create_user_router())
        .nest("/trucks", truck_routes::create_truck_router())
        .nest("/orders", order_routes::create_admin_order_router())
        .nest("/credits", credit_routes::create_admin_credit_router())
        .nest("/supply-houses", catalog_routes::create_admin_supply_house_router())
        .nest("/inventory-items", catalog_routes::create_admin_inventory_router())
        .nest("/settings", settings_routes::create_settings_router())
        .route("/dashboard", get(settings_routes::get_dashboard))
        .route_layer(middleware::from_fn(admin_only_middleware));

    let protected = Router::new()
        .route("/auth/me", get(auth_routes::me))
        .nest("/admin", admin)
        .nest("/technician", bin_routes::create_technician_router())
        .nest("/orders", order_routes::create_order_router())
        .nest("/credits", credit_routes::create_credit_router())
        .route("/supply-houses", get(catalog_routes::list_supply_houses))
        .route("/inventory-items", get(catalog_routes::list_inventory_items))
        .route("/invoice/:id", get(order_routes::get_invoice))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let api = Router::new()
        .merge(auth_routes::create_auth_router())
        .merge(protected);

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(ready))
        .nest("/api", api)
        .fallback(not_found)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors_middleware(&state.config))
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "truxtok-api",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn ready(State(state): State<AppState>) -> Response {
    match database::ping(&state.pool).await {
        Ok(()) => Json(json!({ "status": "ready", "database": "ok" })).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable", "database": "unreachable" })),
            )
                .into_response()
        }
    }
}

async fn not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}
