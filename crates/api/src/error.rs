use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::error::WorkflowError;
use domain::services::StoreError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Rate limited")]
    RateLimited,

    /// A failed operation whose message is safe to show the caller.
    #[error("Operation failed: {0}")]
    Failed(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg.clone()),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "validation_error", msg.clone()),
            ApiError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                "rate_limited",
                "Too many requests. Please try again later.".into(),
            ),
            ApiError::Failed(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "operation_failed",
                msg.clone(),
            ),
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".into(),
                )
            }
            ApiError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "service_unavailable",
                msg.clone(),
            ),
        };

        let body = ErrorBody {
            error: error_code.into(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ApiError::NotFound("Resource not found".into()),
            StoreError::Conflict(_) => ApiError::Conflict("Resource already exists".into()),
            StoreError::Constraint(msg) => {
                tracing::warn!(detail = %msg, "Store constraint rejected write");
                ApiError::Validation("Request violates a data constraint".into())
            }
            StoreError::Unavailable(msg) => ApiError::Internal(format!("Store error: {}", msg)),
        }
    }
}

impl From<WorkflowError> for ApiError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::Forbidden(msg) => ApiError::Forbidden(msg),
            WorkflowError::NotFound(what) => ApiError::NotFound(format!("{} not found", what)),
            WorkflowError::Validation(msg) => ApiError::Validation(msg),
            WorkflowError::Store(e) => e.into(),
            WorkflowError::Notification(e) => ApiError::Internal(format!("Email dispatch: {}", e)),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        match WorkflowError::from(errors) {
            WorkflowError::Validation(msg) => ApiError::Validation(msg),
            other => other.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (ApiError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (ApiError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ApiError::Conflict("x".into()), StatusCode::CONFLICT),
            (ApiError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (ApiError::RateLimited, StatusCode::TOO_MANY_REQUESTS),
            (ApiError::Failed("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (ApiError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (
                ApiError::ServiceUnavailable("x".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];
        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[tokio::test]
    async fn test_internal_error_hides_details() {
        let response = ApiError::Internal("connection refused on 10.0.0.3".into()).into_response();
        let body = body_json(response).await;
        assert_eq!(body["error"], "internal_error");
        assert_eq!(body["message"], "An internal error occurred");
    }

    #[tokio::test]
    async fn test_failed_error_shows_message() {
        let response = ApiError::Failed("Failed to submit rental request".into()).into_response();
        let body = body_json(response).await;
        assert_eq!(body["message"], "Failed to submit rental request");
    }

    #[test]
    fn test_from_workflow_error() {
        assert!(matches!(
            ApiError::from(WorkflowError::Forbidden("Admin access required".into())),
            ApiError::Forbidden(_)
        ));
        match ApiError::from(WorkflowError::NotFound("Rental request".into())) {
            ApiError::NotFound(msg) => assert_eq!(msg, "Rental request not found"),
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(
            ApiError::from(WorkflowError::Store(StoreError::Unavailable("down".into()))),
            ApiError::Internal(_)
        ));
        assert!(matches!(
            ApiError::from(WorkflowError::Store(StoreError::Conflict("dup".into()))),
            ApiError::Conflict(_)
        ));
    }
}
