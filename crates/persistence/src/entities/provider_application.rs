//! Provider application entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::rental_request::RequestStatusDb;

/// Database row mapping for the provider_applications table.
#[derive(Debug, Clone, FromRow)]
pub struct ProviderApplicationEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub company_name: String,
    pub status: RequestStatusDb,
    pub request_date: DateTime<Utc>,
    pub response_date: Option<DateTime<Utc>>,
    pub admin_notes: Option<String>,
}

impl From<ProviderApplicationEntity> for domain::models::ProviderApplication {
    fn from(entity: ProviderApplicationEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            company_name: entity.company_name,
            status: entity.status.into(),
            request_date: entity.request_date,
            response_date: entity.response_date,
            admin_notes: entity.admin_notes,
        }
    }
}
