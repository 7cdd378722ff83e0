//! Provider application submission.

use axum::{extract::State, http::StatusCode, Json};
use domain::models::{ProviderApplication, SubmitProviderApplication};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CurrentUser;

/// POST /api/v1/provider-applications
pub async fn submit_provider_application(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Json(request): Json<SubmitProviderApplication>,
) -> Result<(StatusCode, Json<ProviderApplication>), ApiError> {
    let application = state
        .workflow
        .submit_provider_application(&session, request)
        .await?;

    Ok((StatusCode::CREATED, Json(application)))
}
