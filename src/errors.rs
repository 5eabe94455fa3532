//! Centralized error handling.
//!
//! Every failure a handler can produce is an [`AppError`]. Client errors are
//! rendered as `{"msg": ...}` with status 400; store and internal failures
//! are logged and rendered as an opaque plain-text 500.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::config::SERVER_ERROR_MESSAGE;
use crate::types::MessageResponse;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Credential errors
    #[error("Invalid credentials")]
    Unauthorized,

    // Resource errors
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0} already exists")]
    Conflict(String),

    // Validation
    #[error("{0}")]
    Validation(String),

    // External service errors
    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized
            | AppError::NotFound(_)
            | AppError::Conflict(_)
            | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the details of this error must stay server-side.
    pub fn is_internal(&self) -> bool {
        matches!(self, AppError::Database(_) | AppError::Internal(_))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if !self.is_internal() {
            return (self.status(), Json(MessageResponse::new(self.to_string()))).into_response();
        }

        match &self {
            AppError::Database(e) => tracing::error!("Database error: {:?}", e),
            AppError::Internal(msg) => tracing::error!("Internal error: {}", msg),
            _ => {}
        }
        (self.status(), SERVER_ERROR_MESSAGE).into_response()
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Convenience constructors
impl AppError {
    pub fn conflict(entity: impl Into<String>) -> Self {
        AppError::Conflict(entity.into())
    }

    pub fn not_found(entity: impl Into<String>) -> Self {
        AppError::NotFound(entity.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use axum::http::header::CONTENT_TYPE;

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_conflict_renders_user_already_exists() {
        let response = AppError::conflict("User").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body, serde_json::json!({ "msg": "User already exists" }));
    }

    #[tokio::test]
    async fn test_not_found_and_unauthorized_messages() {
        let response = AppError::not_found("User").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_string(response).await, r#"{"msg":"User not found"}"#);

        let response = AppError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_string(response).await, r#"{"msg":"Invalid credentials"}"#);
    }

    #[tokio::test]
    async fn test_internal_error_hides_details() {
        let response = AppError::internal("argon2 exploded at 0xdeadbeef").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let content_type = response.headers().get(CONTENT_TYPE).cloned().unwrap();
        assert!(content_type.to_str().unwrap().starts_with("text/plain"));
        assert_eq!(body_string(response).await, "Server error");
    }

    #[tokio::test]
    async fn test_database_error_hides_details() {
        let err = AppError::from(sea_orm::DbErr::Custom("connection refused".into()));
        assert!(err.is_internal());

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_string(response).await, "Server error");
    }

    #[test]
    fn test_client_errors_are_not_internal() {
        assert!(!AppError::Unauthorized.is_internal());
        assert!(!AppError::validation("bad").is_internal());
        assert!(!AppError::conflict("User").is_internal());
    }
}
