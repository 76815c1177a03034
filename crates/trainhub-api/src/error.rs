//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use trainhub_core::error::{AppError, ErrorKind};

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

/// Handler error: an [`AppError`] rendered as JSON with the matching status.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl ApiError {
    /// HTTP status and error code for an error kind.
    pub fn status_and_code(kind: ErrorKind) -> (StatusCode, &'static str) {
        match kind {
            ErrorKind::Validation => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ErrorKind::Authentication => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ErrorKind::Authorization => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            ErrorKind::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ErrorKind::Conflict => (StatusCode::CONFLICT, "CONFLICT"),
            ErrorKind::InvalidTransition => {
                (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_TRANSITION")
            }
            ErrorKind::Internal
            | ErrorKind::Database
            | ErrorKind::Configuration
            | ErrorKind::Serialization => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let (status, error_code) = Self::status_and_code(err.kind);

        // Server-side failures keep their detail in the log only.
        let message = if !err.is_client_error() {
            tracing::error!(kind = %err.kind, error = %err, source = ?err.source, "Request failed");
            "An internal error occurred".to_string()
        } else {
            err.message
        };

        let body = ApiErrorResponse {
            error: error_code.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workflow_errors_map_to_distinct_statuses() {
        assert_eq!(
            ApiError::status_and_code(ErrorKind::InvalidTransition).0,
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(ApiError::status_and_code(ErrorKind::Conflict).0, StatusCode::CONFLICT);
        assert_eq!(
            ApiError::status_and_code(ErrorKind::Authorization).0,
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::status_and_code(ErrorKind::Database).0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    async fn body_of(err: AppError) -> (StatusCode, ApiErrorResponse) {
        let response = ApiError(err).into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_database_message_is_hidden() {
        let (status, body) = body_of(AppError::database("relation \"x\" does not exist")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "INTERNAL_ERROR");
        assert_eq!(body.message, "An internal error occurred");
    }

    #[tokio::test]
    async fn test_client_error_keeps_its_message() {
        let (status, body) = body_of(AppError::invalid_transition("Session is 'cancelled'")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.error, "INVALID_TRANSITION");
        assert_eq!(body.message, "Session is 'cancelled'");
    }
}
