//! Decision notifier endpoint.
//!
//! Browser clients call this cross-origin, so every response (including
//! the preflight and failures) carries the same fixed CORS headers.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use domain::error::WorkflowError;
use domain::models::RequestDecision;
use domain::services::NotificationOutcome;
use serde_json::json;

use crate::app::AppState;
use crate::middleware::metrics::record_decision_email;
use crate::middleware::user_auth::bearer_token;
use crate::services::AuthError;

pub const ALLOW_HEADERS: &str = "authorization, x-client-info, apikey, content-type";

fn with_cors(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
    response
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    with_cors((status, Json(json!({ "error": message.into() }))).into_response())
}

/// OPTIONS /api/v1/request-decisions
pub async fn preflight() -> Response {
    with_cors(StatusCode::OK.into_response())
}

/// POST /api/v1/request-decisions
///
/// Records the decision on a rental request or provider application and
/// emails the requester. Every call re-stamps the row and re-sends.
pub async fn send_request_notification(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<RequestDecision>, JsonRejection>,
) -> Response {
    let Some(token) = bearer_token(&headers) else {
        return error_response(StatusCode::UNAUTHORIZED, "Missing Authorization header");
    };

    let session = match state.auth.resolve_session(token).await {
        Ok(session) => session,
        Err(AuthError::Store(e)) => {
            tracing::error!(error = %e, "Session lookup failed");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
        }
        Err(e) => {
            tracing::debug!(error = %e, "Notifier rejected token");
            return error_response(StatusCode::UNAUTHORIZED, "Invalid or expired token");
        }
    };

    let admin = match session.admin() {
        Ok(admin) => admin,
        Err(e) => return error_response(StatusCode::FORBIDDEN, e.to_string()),
    };

    let Json(decision) = match body {
        Ok(body) => body,
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "Malformed decision payload");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, rejection.body_text());
        }
    };

    match state.notifier.handle(&admin, decision).await {
        Ok(NotificationOutcome::Sent) => {
            record_decision_email("sent");
            with_cors(Json(json!({ "success": true, "emailSent": true })).into_response())
        }
        Ok(NotificationOutcome::NoEmail) => {
            record_decision_email("no_email");
            with_cors(
                Json(json!({ "success": true, "message": "Status updated (no email)" }))
                    .into_response(),
            )
        }
        Ok(NotificationOutcome::Suppressed) => {
            record_decision_email("disabled");
            with_cors(
                Json(json!({
                    "success": true,
                    "emailSent": false,
                    "message": "Status updated (email delivery disabled)"
                }))
                .into_response(),
            )
        }
        Err(e) => {
            if matches!(e, WorkflowError::Notification(_)) {
                record_decision_email("failed");
            }
            tracing::error!(error = %e, "Error in request notification");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}
