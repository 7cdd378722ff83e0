//! Persistence seams.
//!
//! The workflow talks to storage only through these traits. The
//! persistence crate implements them over PostgreSQL; [`super::memory`]
//! provides an in-process implementation for tests and local runs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    Credentials, Decision, NewProfile, NewProviderApplication, NewRentalRequest, NewSession,
    Profile, ProviderApplication, RentalRequest,
};

/// Storage failures, independent of the backing database.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Record not found")]
    NotFound,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Constraint violated: {0}")]
    Constraint(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// The `rental_requests` relation.
#[async_trait]
pub trait RentalRequestStore: Send + Sync {
    /// Inserts a pending request and returns the stored row.
    async fn insert(&self, new: NewRentalRequest) -> Result<RentalRequest, StoreError>;

    /// All requests, newest `request_date` first.
    async fn list_all(&self) -> Result<Vec<RentalRequest>, StoreError>;

    /// Requests made by one user, newest `request_date` first.
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<RentalRequest>, StoreError>;

    /// Writes status, response date and notes on one row.
    ///
    /// Unconditional: an already-decided row is overwritten. Returns `None`
    /// when no row has the given id.
    async fn record_decision(
        &self,
        id: Uuid,
        decision: &Decision,
    ) -> Result<Option<RentalRequest>, StoreError>;
}

/// The `provider_applications` relation.
#[async_trait]
pub trait ProviderApplicationStore: Send + Sync {
    async fn insert(
        &self,
        new: NewProviderApplication,
    ) -> Result<ProviderApplication, StoreError>;

    /// Same semantics as [`RentalRequestStore::record_decision`].
    async fn record_decision(
        &self,
        id: Uuid,
        decision: &Decision,
    ) -> Result<Option<ProviderApplication>, StoreError>;
}

/// The `profiles` relation.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fails with `Conflict` when the email is already registered.
    async fn create(&self, new: NewProfile) -> Result<Profile, StoreError>;

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<Profile>, StoreError>;

    async fn find_by_user_ids(&self, user_ids: &[Uuid]) -> Result<Vec<Profile>, StoreError>;

    /// All profiles, newest `created_at` first.
    async fn list_all(&self) -> Result<Vec<Profile>, StoreError>;

    /// Looks up login credentials by normalized email.
    async fn find_credentials(&self, email: &str) -> Result<Option<Credentials>, StoreError>;
}

/// The `sessions` relation backing issued tokens.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn create(&self, session: NewSession) -> Result<(), StoreError>;

    /// True when the session exists, is not revoked and has not expired at `now`.
    async fn is_active(&self, jti: &str, now: DateTime<Utc>) -> Result<bool, StoreError>;

    /// Marks the session revoked. Returns false when it was unknown or already revoked.
    async fn revoke(&self, jti: &str, now: DateTime<Utc>) -> Result<bool, StoreError>;
}

/// Liveness of the backing store.
#[async_trait]
pub trait StoreHealth: Send + Sync {
    async fn ping(&self) -> Result<(), StoreError>;
}
