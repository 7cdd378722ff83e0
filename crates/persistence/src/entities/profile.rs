//! Profile entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::ProfileRole;
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for profile role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "profile_role", rename_all = "lowercase")]
pub enum ProfileRoleDb {
    Renter,
    Admin,
}

impl From<ProfileRoleDb> for ProfileRole {
    fn from(role: ProfileRoleDb) -> Self {
        match role {
            ProfileRoleDb::Renter => ProfileRole::Renter,
            ProfileRoleDb::Admin => ProfileRole::Admin,
        }
    }
}

impl From<ProfileRole> for ProfileRoleDb {
    fn from(role: ProfileRole) -> Self {
        match role {
            ProfileRole::Renter => ProfileRoleDb::Renter,
            ProfileRole::Admin => ProfileRoleDb::Admin,
        }
    }
}

/// Database row mapping for the profiles table, without the password hash.
#[derive(Debug, Clone, FromRow)]
pub struct ProfileEntity {
    pub user_id: Uuid,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: ProfileRoleDb,
    pub created_at: DateTime<Utc>,
}

impl From<ProfileEntity> for domain::models::Profile {
    fn from(entity: ProfileEntity) -> Self {
        Self {
            user_id: entity.user_id,
            full_name: entity.full_name,
            email: entity.email,
            phone: entity.phone,
            role: entity.role.into(),
            created_at: entity.created_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct CredentialsEntity {
    pub user_id: Uuid,
    pub password_hash: String,
}

impl From<CredentialsEntity> for domain::models::Credentials {
    fn from(entity: CredentialsEntity) -> Self {
        Self {
            user_id: entity.user_id,
            password_hash: entity.password_hash,
        }
    }
}
