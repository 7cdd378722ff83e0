//! Authenticated session context.
//!
//! A [`Session`] is built for each request from a validated token and the
//! caller's current profile, then passed explicitly to every operation.
//! Admin-only operations additionally require an [`AdminCapability`], which
//! can only be obtained from a session whose profile carries the admin role.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::profile::ProfileRole;
use crate::error::WorkflowError;

/// The signed-in caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: Uuid,
    pub role: ProfileRole,
    /// Token id of the backing session record.
    pub session_id: String,
}

impl Session {
    pub fn new(user_id: Uuid, role: ProfileRole, session_id: impl Into<String>) -> Self {
        Self {
            user_id,
            role,
            session_id: session_id.into(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == ProfileRole::Admin
    }

    /// Grants the admin capability, or fails with `Forbidden`.
    pub fn admin(&self) -> Result<AdminCapability, WorkflowError> {
        if self.is_admin() {
            Ok(AdminCapability {
                admin_id: self.user_id,
            })
        } else {
            Err(WorkflowError::Forbidden(
                "Admin access required".to_string(),
            ))
        }
    }
}

/// Proof that the holder acts as an admin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminCapability {
    admin_id: Uuid,
}

impl AdminCapability {
    pub fn admin_id(&self) -> Uuid {
        self.admin_id
    }
}

/// Session record written at sign-in.
#[derive(Debug, Clone)]
pub struct NewSession {
    pub jti: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}
