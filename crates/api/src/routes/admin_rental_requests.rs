//! Admin review queue and decisions for rental requests.

use axum::{
    extract::{Path, State},
    Json,
};
use domain::models::{DecideRentalRequest, RentalRequest, ReviewQueue};
use serde::Serialize;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::middleware::metrics::{record_decision_email, record_rental_decision};

/// The decided row plus whether its requester was emailed.
#[derive(Debug, Serialize)]
pub struct DecisionResponse {
    #[serde(flatten)]
    pub request: RentalRequest,
    pub email_sent: bool,
}

/// GET /api/v1/admin/rental-requests
pub async fn review_queue(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
) -> Result<Json<ReviewQueue>, ApiError> {
    let admin = session.admin()?;
    let queue = state.workflow.review_queue(&admin).await?;

    tracing::debug!(
        pending = queue.pending.len(),
        processed = queue.processed.len(),
        "Loaded review queue"
    );
    Ok(Json(queue))
}

/// POST /api/v1/admin/rental-requests/:id/decision
pub async fn decide(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Path(request_id): Path<Uuid>,
    Json(request): Json<DecideRentalRequest>,
) -> Result<Json<DecisionResponse>, ApiError> {
    let admin = session.admin()?;
    let status = request.status;

    let decided = state.workflow.decide(&admin, request_id, request).await?;

    record_rental_decision(status);
    if state.config.notifications.notify_on_review_decision {
        record_decision_email(if decided.email_sent { "sent" } else { "not_sent" });
    }

    Ok(Json(DecisionResponse {
        request: decided.request,
        email_sent: decided.email_sent,
    }))
}
