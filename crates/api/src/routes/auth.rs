//! Authentication routes: sign-up, sign-in, session lookup and sign-out.

use axum::{extract::State, http::StatusCode, Json};
use domain::models::{Profile, ProfileRole};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::services::{AuthResult, Registration};

/// Request body for account registration.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, max = 128, message = "Password is required"))]
    pub password: String,

    #[validate(length(max = 100, message = "Full name must be at most 100 characters"))]
    pub full_name: Option<String>,

    #[validate(length(max = 32, message = "Phone must be at most 32 characters"))]
    pub phone: Option<String>,
}

/// Request body for sign-in.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Issued access token plus the signed-in profile.
#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: Profile,
}

impl From<AuthResult> for TokenResponse {
    fn from(result: AuthResult) -> Self {
        Self {
            access_token: result.access_token,
            token_type: "Bearer".to_string(),
            expires_in: result.expires_in,
            user: result.profile,
        }
    }
}

/// The caller's identity as seen by the server.
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub user_id: Uuid,
    pub role: ProfileRole,
    pub is_admin: bool,
}

/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), ApiError> {
    request.validate()?;

    let result = state
        .auth
        .register(Registration {
            email: request.email,
            password: request.password,
            full_name: request.full_name,
            phone: request.phone,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(result.into())))
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    request.validate()?;

    let result = state.auth.login(&request.email, &request.password).await?;
    Ok(Json(result.into()))
}

/// GET /api/v1/auth/session
pub async fn session(CurrentUser(session): CurrentUser) -> Json<SessionResponse> {
    Json(SessionResponse {
        user_id: session.user_id,
        is_admin: session.is_admin(),
        role: session.role,
    })
}

/// POST /api/v1/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
) -> Result<StatusCode, ApiError> {
    state.auth.logout(&session).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_validation() {
        let request = RegisterRequest {
            email: "farmer@example.com".to_string(),
            password: "harvest2025".to_string(),
            full_name: Some("Asha Patil".to_string()),
            phone: None,
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_register_request_invalid_email() {
        let request = RegisterRequest {
            email: "not-an-email".to_string(),
            password: "harvest2025".to_string(),
            full_name: None,
            phone: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_login_request_requires_password() {
        let request = LoginRequest {
            email: "farmer@example.com".to_string(),
            password: String::new(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_register_request_optional_fields() {
        let body = r#"{"email":"farmer@example.com","password":"harvest2025"}"#;
        let request: RegisterRequest = serde_json::from_str(body).unwrap();
        assert!(request.full_name.is_none());
        assert!(request.phone.is_none());
    }
}
