//! Bearer-token authentication middleware.
//!
//! Resolves the caller's [`Session`] once per request and stores it in
//! request extensions for handlers and later middleware.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use domain::models::Session;
use serde_json::json;

use crate::app::AppState;
use crate::services::AuthError;

/// Returns the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Rejects requests without an active session.
pub async fn require_user(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(req.headers()) else {
        return unauthorized_response("Missing or invalid Authorization header");
    };

    let resolved = state.auth.resolve_session(token).await;
    match resolved {
        Ok(session) => {
            req.extensions_mut().insert::<Session>(session);
            next.run(req).await
        }
        Err(AuthError::Store(e)) => {
            tracing::error!(error = %e, "Session lookup failed");
            internal_error_response("Authentication service unavailable")
        }
        Err(e) => {
            tracing::debug!(error = %e, "Session resolution failed");
            unauthorized_response("Invalid or expired token")
        }
    }
}

fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "unauthorized",
            "message": message
        })),
    )
        .into_response()
}

fn internal_error_response(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "internal_error",
            "message": message
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(bearer_token(&headers("Bearer abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(bearer_token(&headers("Basic dXNlcjpwYXNz")), None);
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_unauthorized_response() {
        let response = unauthorized_response("Invalid or expired token");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_internal_error_response() {
        let response = internal_error_response("Authentication service unavailable");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
