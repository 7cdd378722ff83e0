//! In-process store implementing every persistence seam.
//!
//! Used by tests and by local runs without PostgreSQL. Ordering and
//! overwrite semantics match the SQL repositories.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::store::{
    ProfileStore, ProviderApplicationStore, RentalRequestStore, SessionStore, StoreError,
    StoreHealth,
};
use crate::models::{
    Credentials, Decision, NewProfile, NewProviderApplication, NewRentalRequest, NewSession,
    Profile, ProviderApplication, RentalRequest, RequestStatus,
};

#[derive(Debug, Clone)]
struct StoredProfile {
    profile: Profile,
    password_hash: String,
}

#[derive(Debug, Clone)]
struct StoredSession {
    user_id: Uuid,
    expires_at: DateTime<Utc>,
    revoked_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    rentals: Vec<RentalRequest>,
    providers: Vec<ProviderApplication>,
    profiles: Vec<StoredProfile>,
    sessions: HashMap<String, StoredSession>,
    unavailable: bool,
}

impl MemoryState {
    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable {
            Err(StoreError::Unavailable("in-memory store offline".to_string()))
        } else {
            Ok(())
        }
    }

    fn has_profile(&self, user_id: Uuid) -> bool {
        self.profiles.iter().any(|p| p.profile.user_id == user_id)
    }
}

/// Shared in-memory store. Clones see the same data.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail with `Unavailable` (or recover).
    pub async fn set_unavailable(&self, unavailable: bool) {
        self.state.lock().await.unavailable = unavailable;
    }

    /// Number of sessions recorded for a user, revoked ones included.
    pub async fn session_count(&self, user_id: Uuid) -> usize {
        self.state
            .lock()
            .await
            .sessions
            .values()
            .filter(|s| s.user_id == user_id)
            .count()
    }
}

fn newest_first<T>(items: &mut [T], date: impl Fn(&T) -> DateTime<Utc>) {
    items.sort_by_key(|item| std::cmp::Reverse(date(item)));
}

#[async_trait]
impl RentalRequestStore for InMemoryStore {
    async fn insert(&self, new: NewRentalRequest) -> Result<RentalRequest, StoreError> {
        let mut state = self.state.lock().await;
        state.check_available()?;
        if !state.has_profile(new.user_id) {
            return Err(StoreError::Constraint(
                "rental_requests.user_id must reference a profile".to_string(),
            ));
        }

        let request = RentalRequest {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            equipment_name: new.equipment.name,
            equipment_price: new.equipment.price,
            status: RequestStatus::Pending,
            request_date: new.requested_at,
            response_date: None,
            admin_notes: None,
        };
        state.rentals.push(request.clone());
        Ok(request)
    }

    async fn list_all(&self) -> Result<Vec<RentalRequest>, StoreError> {
        let state = self.state.lock().await;
        state.check_available()?;
        let mut rows = state.rentals.clone();
        newest_first(&mut rows, |r| r.request_date);
        Ok(rows)
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<RentalRequest>, StoreError> {
        let state = self.state.lock().await;
        state.check_available()?;
        let mut rows: Vec<_> = state
            .rentals
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        newest_first(&mut rows, |r| r.request_date);
        Ok(rows)
    }

    async fn record_decision(
        &self,
        id: Uuid,
        decision: &Decision,
    ) -> Result<Option<RentalRequest>, StoreError> {
        let mut state = self.state.lock().await;
        state.check_available()?;
        Ok(state.rentals.iter_mut().find(|r| r.id == id).map(|row| {
            row.status = decision.status.into();
            row.response_date = Some(decision.decided_at);
            row.admin_notes = decision.admin_notes.clone();
            row.clone()
        }))
    }
}

#[async_trait]
impl ProviderApplicationStore for InMemoryStore {
    async fn insert(
        &self,
        new: NewProviderApplication,
    ) -> Result<ProviderApplication, StoreError> {
        let mut state = self.state.lock().await;
        state.check_available()?;
        if !state.has_profile(new.user_id) {
            return Err(StoreError::Constraint(
                "provider_applications.user_id must reference a profile".to_string(),
            ));
        }

        let application = ProviderApplication {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            company_name: new.company_name,
            status: RequestStatus::Pending,
            request_date: new.requested_at,
            response_date: None,
            admin_notes: None,
        };
        state.providers.push(application.clone());
        Ok(application)
    }

    async fn record_decision(
        &self,
        id: Uuid,
        decision: &Decision,
    ) -> Result<Option<ProviderApplication>, StoreError> {
        let mut state = self.state.lock().await;
        state.check_available()?;
        Ok(state.providers.iter_mut().find(|p| p.id == id).map(|row| {
            row.status = decision.status.into();
            row.response_date = Some(decision.decided_at);
            row.admin_notes = decision.admin_notes.clone();
            row.clone()
        }))
    }
}

#[async_trait]
impl ProfileStore for InMemoryStore {
    async fn create(&self, new: NewProfile) -> Result<Profile, StoreError> {
        let mut state = self.state.lock().await;
        state.check_available()?;
        let taken = state
            .profiles
            .iter()
            .any(|p| p.profile.email.as_deref() == Some(new.email.as_str()));
        if taken {
            return Err(StoreError::Conflict("email already registered".to_string()));
        }

        let profile = Profile {
            user_id: new.user_id,
            full_name: new.full_name,
            email: Some(new.email),
            phone: new.phone,
            role: new.role,
            created_at: new.created_at,
        };
        state.profiles.push(StoredProfile {
            profile: profile.clone(),
            password_hash: new.password_hash,
        });
        Ok(profile)
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<Profile>, StoreError> {
        let state = self.state.lock().await;
        state.check_available()?;
        Ok(state
            .profiles
            .iter()
            .find(|p| p.profile.user_id == user_id)
            .map(|p| p.profile.clone()))
    }

    async fn find_by_user_ids(&self, user_ids: &[Uuid]) -> Result<Vec<Profile>, StoreError> {
        let state = self.state.lock().await;
        state.check_available()?;
        Ok(state
            .profiles
            .iter()
            .filter(|p| user_ids.contains(&p.profile.user_id))
            .map(|p| p.profile.clone())
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<Profile>, StoreError> {
        let state = self.state.lock().await;
        state.check_available()?;
        let mut rows: Vec<_> = state.profiles.iter().map(|p| p.profile.clone()).collect();
        newest_first(&mut rows, |p| p.created_at);
        Ok(rows)
    }

    async fn find_credentials(&self, email: &str) -> Result<Option<Credentials>, StoreError> {
        let state = self.state.lock().await;
        state.check_available()?;
        Ok(state
            .profiles
            .iter()
            .find(|p| p.profile.email.as_deref() == Some(email))
            .map(|p| Credentials {
                user_id: p.profile.user_id,
                password_hash: p.password_hash.clone(),
            }))
    }
}

#[async_trait]
impl SessionStore for InMemoryStore {
    async fn create(&self, session: NewSession) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        state.check_available()?;
        state.sessions.insert(
            session.jti,
            StoredSession {
                user_id: session.user_id,
                expires_at: session.expires_at,
                revoked_at: None,
            },
        );
        Ok(())
    }

    async fn is_active(&self, jti: &str, now: DateTime<Utc>) -> Result<bool, StoreError> {
        let state = self.state.lock().await;
        state.check_available()?;
        Ok(state
            .sessions
            .get(jti)
            .map(|s| s.revoked_at.is_none() && s.expires_at > now)
            .unwrap_or(false))
    }

    async fn revoke(&self, jti: &str, now: DateTime<Utc>) -> Result<bool, StoreError> {
        let mut state = self.state.lock().await;
        state.check_available()?;
        match state.sessions.get_mut(jti) {
            Some(session) if session.revoked_at.is_none() => {
                session.revoked_at = Some(now);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl StoreHealth for InMemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.state.lock().await.check_available()
    }
}
