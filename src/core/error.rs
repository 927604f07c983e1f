use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::shared::types::ApiResponse;

#[derive(Debug, Error)]
#[allow(dead_code)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Location unavailable: {0}")]
    LocationUnavailable(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    /// A status value outside the closed enumeration reached the data model.
    #[error("Invalid status kind: {0}")]
    InvalidStatusKind(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("External service error: {0}")]
    ExternalServiceError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            AppError::NotFound(ref msg) => (StatusCode::NOT_FOUND, msg.clone(), None),
            AppError::Validation(ref msg) => (
                StatusCode::BAD_REQUEST,
                msg.clone(),
                Some(vec![msg.clone()]),
            ),
            AppError::LocationUnavailable(ref msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                msg.clone(),
                Some(vec![msg.clone()]),
            ),
            AppError::UploadFailed(ref msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                msg.clone(),
                Some(vec![msg.clone()]),
            ),
            AppError::InvalidStatusKind(ref kind) => {
                tracing::error!("Report data integrity violation, unknown status: {}", kind);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Report has an invalid status: {}", kind),
                    None,
                )
            }
            AppError::BadRequest(ref msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
            AppError::Auth(ref msg) => (StatusCode::UNAUTHORIZED, msg.clone(), None),
            AppError::Unauthorized(ref msg) => (StatusCode::UNAUTHORIZED, msg.clone(), None),
            AppError::Forbidden(ref msg) => (StatusCode::FORBIDDEN, msg.clone(), None),
            AppError::Conflict(ref msg) => (StatusCode::CONFLICT, msg.clone(), None),
            AppError::ExternalServiceError(ref msg) => {
                tracing::error!("External service error: {}", msg);
                (StatusCode::BAD_GATEWAY, msg.clone(), None)
            }
        };

        let body = Json(ApiResponse::<()>::error(Some(message), errors));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_errors_map_to_client_statuses() {
        let cases = [
            (AppError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (
                AppError::LocationUnavailable("x".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                AppError::UploadFailed("x".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (AppError::Conflict("x".into()), StatusCode::CONFLICT),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_invalid_status_kind_fails_loudly() {
        let response = AppError::InvalidStatusKind("Archived".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
