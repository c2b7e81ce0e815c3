//! HTTP Error Handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::application::{ApplicationError, RepositoryError};

/// 统一错误响应格式
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub errno: i32,
    pub error: String,
    pub data: Option<()>,
}

impl ErrorResponse {
    pub fn new(errno: i32, error: impl Into<String>) -> Self {
        Self {
            errno,
            error: error.into(),
            data: None,
        }
    }
}

/// 错误码定义
pub mod errno {
    pub const BAD_REQUEST: i32 = 400;
    pub const NOT_FOUND: i32 = 404;
    pub const CONFLICT: i32 = 409;
    pub const INTERNAL_ERROR: i32 = 500;
    pub const SERVICE_UNAVAILABLE: i32 = 503;
}

/// API 错误
///
/// 始终以 HTTP 200 返回，错误码放在 errno 字段
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Internal(String),
    Conflict(String),
    ServiceUnavailable(String),
}

impl ApiError {
    pub fn errno(&self) -> i32 {
        match self {
            ApiError::NotFound(_) => errno::NOT_FOUND,
            ApiError::BadRequest(_) => errno::BAD_REQUEST,
            ApiError::Internal(_) => errno::INTERNAL_ERROR,
            ApiError::Conflict(_) => errno::CONFLICT,
            ApiError::ServiceUnavailable(_) => errno::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.errno();
        let msg = match self {
            ApiError::NotFound(msg) => {
                tracing::warn!(errno = code, error = %msg, "Resource not found");
                msg
            }
            ApiError::BadRequest(msg) => {
                tracing::warn!(errno = code, error = %msg, "Bad request");
                msg
            }
            ApiError::Conflict(msg) => {
                tracing::warn!(errno = code, error = %msg, "Resource conflict");
                msg
            }
            ApiError::Internal(msg) => {
                tracing::error!(errno = code, error = %msg, "Internal server error");
                msg
            }
            ApiError::ServiceUnavailable(msg) => {
                tracing::error!(errno = code, error = %msg, "Service unavailable");
                msg
            }
        };

        (StatusCode::OK, Json(ErrorResponse::new(code, msg))).into_response()
    }
}

impl From<RepositoryError> for ApiError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound(msg) => ApiError::NotFound(msg),
            RepositoryError::Duplicate(msg) => ApiError::Conflict(msg),
            _ => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<ApplicationError> for ApiError {
    fn from(e: ApplicationError) -> Self {
        match e {
            ApplicationError::NotFound { .. } => ApiError::NotFound(e.to_string()),
            ApplicationError::ValidationError(msg) => ApiError::BadRequest(msg),
            ApplicationError::Conflict(msg) => ApiError::Conflict(msg),
            ApplicationError::RepositoryError(msg) => ApiError::Internal(msg),
            ApplicationError::ExternalServiceError(msg) => ApiError::ServiceUnavailable(msg),
            ApplicationError::InternalError(msg) => ApiError::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_application_error_mapping() {
        let cases = [
            (ApplicationError::not_found("Ebook", Uuid::nil()), errno::NOT_FOUND),
            (ApplicationError::validation("bad"), errno::BAD_REQUEST),
            (ApplicationError::Conflict("busy".into()), errno::CONFLICT),
            (ApplicationError::ExternalServiceError("llm".into()), errno::SERVICE_UNAVAILABLE),
            (ApplicationError::internal("boom"), errno::INTERNAL_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).errno(), expected);
        }
    }

    #[tokio::test]
    async fn test_error_is_http_200_with_errno() {
        let response = ApiError::Conflict("busy".into()).into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["errno"], 409);
        assert_eq!(json["error"], "busy");
        assert!(json["data"].is_null());
    }
}
