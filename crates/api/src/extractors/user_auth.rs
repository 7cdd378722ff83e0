//! Signed-in caller extractor.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use domain::models::Session;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::user_auth::bearer_token;

/// The caller's [`Session`].
///
/// Taken from request extensions when `require_user` already ran, otherwise
/// resolved from the bearer token.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Session);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(session) = parts.extensions.get::<Session>() {
            return Ok(CurrentUser(session.clone()));
        }

        let token = bearer_token(&parts.headers)
            .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

        let session = state.auth.resolve_session(token).await?;
        parts.extensions.insert(session.clone());
        Ok(CurrentUser(session))
    }
}
