//! The caller's own profile, rental history and change stream.

use std::convert::Infallible;
use std::time::Duration;

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use domain::models::{Profile, RentalRequest, RequestKind};
use domain::services::RequestChange;
use futures::stream::{self, Stream, StreamExt};
use tokio::sync::broadcast::{self, error::RecvError};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CurrentUser;

pub const RENTAL_REQUEST_UPDATED: &str = "rental_request_updated";

/// GET /api/v1/me/profile
pub async fn profile(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
) -> Result<Json<Profile>, ApiError> {
    Ok(Json(state.workflow.own_profile(&session).await?))
}

/// GET /api/v1/me/rental-requests
pub async fn rental_history(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
) -> Result<Json<Vec<RentalRequest>>, ApiError> {
    Ok(Json(state.workflow.rental_history(&session).await?))
}

/// GET /api/v1/me/rental-requests/events
///
/// One `rental_request_updated` event per review decision on one of the
/// caller's rental requests. The event data is the request id; clients refetch.
pub async fn rental_request_events(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    tracing::debug!(user_id = %session.user_id, "Rental request event stream opened");

    let stream = owner_changes(state.changes.subscribe(), session.user_id).map(|request_id| {
        Ok::<_, Infallible>(
            Event::default()
                .event(RENTAL_REQUEST_UPDATED)
                .data(request_id.to_string()),
        )
    });
    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}

/// Ids of decided rental requests owned by `user_id`.
///
/// Lagged receivers skip what they missed; the stream ends when the feed closes.
fn owner_changes(
    receiver: broadcast::Receiver<RequestChange>,
    user_id: Uuid,
) -> impl Stream<Item = Uuid> {
    stream::unfold(receiver, move |mut receiver| async move {
        loop {
            match receiver.recv().await {
                Ok(change) if change.kind == RequestKind::Rental && change.user_id == user_id => {
                    return Some((change.request_id, receiver));
                }
                Ok(_) => continue,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(user_id = %user_id, skipped, "Event stream lagged");
                    continue;
                }
                Err(RecvError::Closed) => return None,
            }
        }
    })
}
