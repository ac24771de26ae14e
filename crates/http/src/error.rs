//! Error handling for the Eddy & Ink HTTP layer

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use eddy_db::DbError;
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

/// Application error types that map to HTTP responses
#[derive(Error, Debug)]
pub enum AppError {
    #[error("validation error: {message}")]
    Validation {
        details: Vec<serde_json::Value>,
        message: String,
    },

    #[error("not found: {message}")]
    NotFound { message: String },

    #[error(transparent)]
    Storage(#[from] DbError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Create a validation error
    pub fn validation(details: Vec<serde_json::Value>, message: impl Into<String>) -> Self {
        Self::Validation {
            details,
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "validation_error",
            AppError::NotFound { .. } => "not_found",
            AppError::Storage(_) => "storage_error",
            AppError::Internal(_) => "internal_error",
        }
    }
}

/// One field-level validation entry: where it happened, what is wrong, and its kind.
pub fn issue(loc: &[&str], msg: impl Into<String>, kind: &str) -> serde_json::Value {
    json!({
        "loc": loc,
        "msg": msg.into(),
        "type": kind,
    })
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        let message = rejection.body_text();
        Self::validation(vec![issue(&["body"], &message, "json_invalid")], message)
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        let message = rejection.body_text();
        Self::validation(vec![issue(&["query"], &message, "query_invalid")], message)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v4();
        let error_code = self.code();

        let (status, detail) = match self {
            AppError::Validation { details, message } => {
                tracing::debug!(error_id = %error_id, reason = %message, "request rejected");
                (StatusCode::UNPROCESSABLE_ENTITY, json!(details))
            }
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, json!(message)),
            AppError::Storage(e) => (StatusCode::INTERNAL_SERVER_ERROR, json!(e.to_string())),
            AppError::Internal(e) => (StatusCode::INTERNAL_SERVER_ERROR, json!(e.to_string())),
        };

        if status.is_server_error() {
            tracing::error!(
                error_id = %error_id,
                error_code = %error_code,
                status_code = %status.as_u16(),
                detail = %detail,
                "Request error"
            );
        } else {
            tracing::warn!(
                error_id = %error_id,
                error_code = %error_code,
                status_code = %status.as_u16(),
                "Request error"
            );
        }

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use axum::http::StatusCode;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_validation_error() {
        let details = vec![issue(&["body", "email"], "field required", "missing")];
        let error = AppError::validation(details.clone(), "Validation failed");

        match error {
            AppError::Validation { details: d, message } => {
                assert_eq!(d, details);
                assert_eq!(message, "Validation failed");
            }
            _ => panic!("Expected Validation error"),
        }
    }

    #[tokio::test]
    async fn test_validation_error_response_format() {
        let error = AppError::validation(
            vec![issue(&["body", "email"], "field required", "missing")],
            "invalid subscriber",
        );
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = body_json(response).await;
        assert_eq!(body["detail"][0]["loc"], json!(["body", "email"]));
        assert_eq!(body["detail"][0]["msg"], "field required");
        assert_eq!(body["detail"][0]["type"], "missing");
    }

    #[test]
    fn test_error_response_mapping() {
        let error = AppError::not_found("Resource not found");
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_internal_error_carries_text() {
        let internal_error = anyhow::anyhow!("Database connection failed");
        let response = AppError::Internal(internal_error).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({"detail": "Database connection failed"})
        );
    }

    #[tokio::test]
    async fn test_storage_error_maps_to_500() {
        let response = AppError::from(DbError::Unavailable).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert!(body["detail"]
            .as_str()
            .unwrap()
            .starts_with("Database not available"));
    }
}
