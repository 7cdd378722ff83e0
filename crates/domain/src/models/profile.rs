//! Profile domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Authority attached to a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileRole {
    #[default]
    Renter,
    Admin,
}

impl std::fmt::Display for ProfileRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProfileRole::Renter => write!(f, "renter"),
            ProfileRole::Admin => write!(f, "admin"),
        }
    }
}

/// Contact profile of an account holder.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Profile {
    pub user_id: Uuid,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: ProfileRole,
    pub created_at: DateTime<Utc>,
}

/// Profile row created at sign-up, together with the login secret.
#[derive(Debug, Clone)]
pub struct NewProfile {
    pub user_id: Uuid,
    pub full_name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub role: ProfileRole,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Login lookup result.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub user_id: Uuid,
    pub password_hash: String,
}
