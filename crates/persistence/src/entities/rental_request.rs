//! Rental request entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{DecisionStatus, RequestStatus};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for request status, shared with provider applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "request_status", rename_all = "lowercase")]
pub enum RequestStatusDb {
    Pending,
    Approved,
    Rejected,
}

impl From<RequestStatusDb> for RequestStatus {
    fn from(status: RequestStatusDb) -> Self {
        match status {
            RequestStatusDb::Pending => RequestStatus::Pending,
            RequestStatusDb::Approved => RequestStatus::Approved,
            RequestStatusDb::Rejected => RequestStatus::Rejected,
        }
    }
}

impl From<DecisionStatus> for RequestStatusDb {
    fn from(status: DecisionStatus) -> Self {
        match status {
            DecisionStatus::Approved => RequestStatusDb::Approved,
            DecisionStatus::Rejected => RequestStatusDb::Rejected,
        }
    }
}

/// Database row mapping for the rental_requests table.
#[derive(Debug, Clone, FromRow)]
pub struct RentalRequestEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub equipment_name: String,
    pub equipment_price: f64,
    pub status: RequestStatusDb,
    pub request_date: DateTime<Utc>,
    pub response_date: Option<DateTime<Utc>>,
    pub admin_notes: Option<String>,
}

impl From<RentalRequestEntity> for domain::models::RentalRequest {
    fn from(entity: RentalRequestEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            equipment_name: entity.equipment_name,
            equipment_price: entity.equipment_price,
            status: entity.status.into(),
            request_date: entity.request_date,
            response_date: entity.response_date,
            admin_notes: entity.admin_notes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(RequestStatus::from(RequestStatusDb::Pending), RequestStatus::Pending);
        assert_eq!(RequestStatus::from(RequestStatusDb::Rejected), RequestStatus::Rejected);
        assert_eq!(RequestStatusDb::from(DecisionStatus::Approved), RequestStatusDb::Approved);
    }

    #[test]
    fn test_entity_into_domain() {
        let entity = RentalRequestEntity {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            equipment_name: "Rotavator".to_string(),
            equipment_price: 900.0,
            status: RequestStatusDb::Approved,
            request_date: Utc::now(),
            response_date: Some(Utc::now()),
            admin_notes: Some("ok".to_string()),
        };
        let request: domain::models::RentalRequest = entity.clone().into();
        assert_eq!(request.id, entity.id);
        assert_eq!(request.status, RequestStatus::Approved);
        assert_eq!(request.admin_notes.as_deref(), Some("ok"));
    }
}
