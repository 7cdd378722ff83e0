//! Rental request repository for database operations.

use async_trait::async_trait;
use domain::models::{Decision, NewRentalRequest, RentalRequest};
use domain::services::{RentalRequestStore, StoreError};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::store_error;
use crate::entities::{RentalRequestEntity, RequestStatusDb};
use crate::metrics::QueryTimer;

const COLUMNS: &str = "id, user_id, equipment_name, equipment_price, status, request_date, response_date, admin_notes";

/// Repository for the rental_requests table.
#[derive(Clone)]
pub struct RentalRequestRepository {
    pool: PgPool,
}

impl RentalRequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RentalRequestStore for RentalRequestRepository {
    async fn insert(&self, new: NewRentalRequest) -> Result<RentalRequest, StoreError> {
        let timer = QueryTimer::new("insert_rental_request");
        let result = sqlx::query_as::<_, RentalRequestEntity>(&format!(
            r#"
            INSERT INTO rental_requests (user_id, equipment_name, equipment_price, status, request_date)
            VALUES ($1, $2, $3, 'pending', $4)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(new.user_id)
        .bind(&new.equipment.name)
        .bind(new.equipment.price)
        .bind(new.requested_at)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result.map(Into::into).map_err(store_error)
    }

    async fn list_all(&self) -> Result<Vec<RentalRequest>, StoreError> {
        let timer = QueryTimer::new("list_rental_requests");
        let result = sqlx::query_as::<_, RentalRequestEntity>(&format!(
            "SELECT {COLUMNS} FROM rental_requests ORDER BY request_date DESC"
        ))
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
            .map(|rows| rows.into_iter().map(Into::into).collect())
            .map_err(store_error)
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<RentalRequest>, StoreError> {
        let timer = QueryTimer::new("list_rental_requests_for_user");
        let result = sqlx::query_as::<_, RentalRequestEntity>(&format!(
            "SELECT {COLUMNS} FROM rental_requests WHERE user_id = $1 ORDER BY request_date DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
            .map(|rows| rows.into_iter().map(Into::into).collect())
            .map_err(store_error)
    }

    async fn record_decision(
        &self,
        id: Uuid,
        decision: &Decision,
    ) -> Result<Option<RentalRequest>, StoreError> {
        let timer = QueryTimer::new("decide_rental_request");
        let result = sqlx::query_as::<_, RentalRequestEntity>(&format!(
            r#"
            UPDATE rental_requests
            SET status = $2, response_date = $3, admin_notes = $4
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(RequestStatusDb::from(decision.status))
        .bind(decision.decided_at)
        .bind(decision.admin_notes.as_deref())
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result.map(|row| row.map(Into::into)).map_err(store_error)
    }
}
