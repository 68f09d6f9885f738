//! Error handling
//!
//! Every failure in the API is an `AppError`. Each variant maps to one HTTP
//! status and to the `{ success: false, error, code, details? }` envelope the
//! client expects.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

/// Main application errors
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Not found: {message}")]
    NotFoundWithDetails { message: String, details: Value },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("JWT error: {0}")]
    Jwt(String),

    #[error("Hash error: {0}")]
    Hash(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error body returned by the API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_)
            | AppError::Hash(_)
            | AppError::Config(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) | AppError::Jwt(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) | AppError::NotFoundWithDetails { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "DB_ERROR",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::NotFound(_) | AppError::NotFoundWithDetails { .. } => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Jwt(_) => "JWT_ERROR",
            AppError::Hash(_) => "HASH_ERROR",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        let (error, details) = match self {
            AppError::Database(e) => {
                tracing::error!(error = %e, "database error");
                ("An error occurred while accessing the database".to_string(), None)
            }
            AppError::Validation(e) => {
                tracing::warn!(error = %e, "validation error");
                ("The provided data is invalid".to_string(), Some(json!(e)))
            }
            AppError::Hash(msg) => {
                tracing::error!(error = %msg, "hash error");
                ("An error occurred while processing credentials".to_string(), None)
            }
            AppError::Config(msg) | AppError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                ("An unexpected error occurred".to_string(), None)
            }
            AppError::NotFoundWithDetails { message, details } => {
                tracing::warn!(%message, "resource not found");
                (message, Some(details))
            }
            AppError::Unauthorized(msg) | AppError::Jwt(msg) => {
                tracing::warn!(%msg, "unauthorized");
                (msg, None)
            }
            AppError::Forbidden(msg) => {
                tracing::warn!(%msg, "forbidden");
                (msg, None)
            }
            AppError::BadRequest(msg) | AppError::NotFound(msg) | AppError::Conflict(msg) => {
                tracing::debug!(%msg, status = %status, "request rejected");
                (msg, None)
            }
        };

        let body = ErrorResponse {
            success: false,
            error,
            code,
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Typed result for fallible operations
pub type AppResult<T> = Result<T, AppError>;

/// Helper for missing resources
pub fn not_found_error(resource: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}

/// Helper for unique-constraint conflicts
pub fn conflict_error(resource: &str, field: &str, value: &str) -> AppError {
    AppError::Conflict(format!("{} with {} '{}' already exists", resource, field, value))
}

/// Helper for bad requests
pub fn bad_request_error(message: &str) -> AppError {
    AppError::BadRequest(message.to_string())
}

/// Returns true when a sqlx error is a Postgres unique violation (23505)
pub fn is_unique_violation(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(db) => db.code().as_deref() == Some("23505"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(error: AppError) -> (StatusCode, Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn forbidden_keeps_message() {
        let (status, body) =
            body_json(AppError::Forbidden("No technician assigned to truck".into())).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "No technician assigned to truck");
        assert_eq!(body["code"], "FORBIDDEN");
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn internal_errors_do_not_leak() {
        let (status, body) = body_json(AppError::Internal("secret stack trace".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "An unexpected error occurred");
        assert!(!body.to_string().contains("secret"));
    }

    #[tokio::test]
    async fn not_found_with_details_carries_payload() {
        let (status, body) = body_json(AppError::NotFoundWithDetails {
            message: "Item not found in bin".into(),
            details: json!({ "bin_contents": [] }),
        })
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["details"]["bin_contents"], json!([]));
    }

    #[test]
    fn helpers_format_messages() {
        let err = not_found_error("Truck", "abc");
        assert_eq!(err.to_string(), "Not found: Truck with id 'abc' not found");
        let err = conflict_error("User", "email", "a@b.c");
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }
}
