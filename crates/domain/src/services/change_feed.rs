//! In-process change notifications for request rows.
//!
//! Subscribers use these to refresh views when a request they care about
//! is decided. Submissions are not published. Delivery is best-effort: a
//! slow subscriber that falls behind the buffer skips the missed events.

use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::models::{RequestKind, RequestStatus};

/// A request row received a review decision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestChange {
    pub kind: RequestKind,
    pub request_id: Uuid,
    /// Owner of the changed row.
    pub user_id: Uuid,
    pub status: RequestStatus,
}

#[derive(Debug, Clone)]
pub struct ChangeFeed {
    sender: broadcast::Sender<RequestChange>,
}

impl ChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishes a change. Having no subscribers is not an error.
    pub fn publish(&self, change: RequestChange) {
        let request_id = change.request_id;
        match self.sender.send(change) {
            Ok(receivers) => {
                tracing::debug!(request_id = %request_id, receivers, "Published request change");
            }
            Err(_) => {
                tracing::trace!(request_id = %request_id, "No change feed subscribers");
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RequestChange> {
        self.sender.subscribe()
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new(256)
    }
}
