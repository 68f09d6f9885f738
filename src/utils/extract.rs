//! Request extractors
//!
//! Wrappers around axum's `Json` and `Query` whose rejections are `AppError`s,
//! so malformed bodies and query strings get the JSON error envelope.

use axum::{
    async_trait,
    extract::{
        rejection::{JsonRejection, QueryRejection},
        FromRequest, FromRequestParts, Query, Request,
    },
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;

use crate::utils::errors::AppError;

/// JSON body extractor answering 400 with the error envelope
#[derive(Debug, Clone, Copy, Default)]
pub struct AppJson<T>(pub T);

/// Query string extractor answering 400 with the error envelope
#[derive(Debug, Clone, Copy, Default)]
pub struct AppQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(request, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(AppError::from(rejection)),
        }
    }
}

#[async_trait]
impl<S, T> FromRequestParts<S> for AppQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => Err(AppError::from(rejection)),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(reason = %rejection.body_text(), "json body rejected");

        let message = match rejection {
            JsonRejection::JsonSyntaxError(_) => "Request body is not valid JSON",
            JsonRejection::JsonDataError(_) => "Request body has missing or invalid fields",
            JsonRejection::MissingJsonContentType(_) => "Expected a JSON body with Content-Type: application/json",
            _ => "Request body could not be read",
        };
        AppError::BadRequest(message.to_string())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::debug!(reason = %rejection.body_text(), "query string rejected");
        AppError::BadRequest("Invalid query parameters".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::header, response::IntoResponse};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Login {
        #[allow(dead_code)]
        email: String,
    }

    #[derive(Debug, Deserialize)]
    struct Paging {
        #[allow(dead_code)]
        page: Option<i64>,
    }

    fn json_request(body: &'static str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_of(error: AppError) -> serde_json::Value {
        let response = error.into_response();
        assert_eq!(response.status(), axum::http::StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn syntax_errors_become_bad_request() {
        let error = AppJson::<Login>::from_request(json_request("not json"), &())
            .await
            .unwrap_err();
        let body = body_of(error).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "BAD_REQUEST");
        assert_eq!(body["error"], "Request body is not valid JSON");
    }

    #[tokio::test]
    async fn wrong_field_types_do_not_leak_serde_details() {
        let error = AppJson::<Login>::from_request(json_request(r#"{"email":5}"#), &())
            .await
            .unwrap_err();
        let body = body_of(error).await;
        assert_eq!(body["error"], "Request body has missing or invalid fields");
        assert!(!body.to_string().contains("invalid type"));
    }

    #[tokio::test]
    async fn bad_query_strings_become_bad_request() {
        let request = Request::builder().uri("/?page=abc").body(Body::empty()).unwrap();
        let (mut parts, _) = request.into_parts();
        let error = AppQuery::<Paging>::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        let body = body_of(error).await;
        assert_eq!(body["error"], "Invalid query parameters");
    }
}
