//! Session entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the sessions table.
#[derive(Debug, Clone, FromRow)]
pub struct SessionEntity {
    pub jti: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl SessionEntity {
    /// Whether the session may still authenticate requests at `now`.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.revoked_at.is_none() && self.expires_at > now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session(expires_in: Duration, revoked: bool) -> SessionEntity {
        let now = Utc::now();
        SessionEntity {
            jti: "jti".to_string(),
            user_id: Uuid::new_v4(),
            created_at: now,
            expires_at: now + expires_in,
            revoked_at: revoked.then_some(now),
        }
    }

    #[test]
    fn test_is_active_at() {
        let now = Utc::now();
        assert!(session(Duration::hours(1), false).is_active_at(now));
        assert!(!session(Duration::hours(1), true).is_active_at(now));
        assert!(!session(Duration::hours(-1), false).is_active_at(now));
    }
}
