//! Rental request submission.

use axum::{extract::State, http::StatusCode, Json};
use domain::error::WorkflowError;
use domain::models::{RentalRequest, SubmitRentalRequest};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::middleware::metrics::record_rental_request_submitted;

/// POST /api/v1/rental-requests
///
/// Creates a pending request for the caller. Storage failures surface as a
/// visible "Failed to submit rental request" message.
pub async fn submit_rental_request(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Json(request): Json<SubmitRentalRequest>,
) -> Result<(StatusCode, Json<RentalRequest>), ApiError> {
    let created = state
        .workflow
        .submit_rental_request(&session, request)
        .await
        .map_err(|e| match e {
            WorkflowError::Store(store) => {
                tracing::error!(user_id = %session.user_id, error = %store, "Rental request insert failed");
                ApiError::Failed("Failed to submit rental request".to_string())
            }
            other => other.into(),
        })?;

    record_rental_request_submitted();
    Ok((StatusCode::CREATED, Json(created)))
}
