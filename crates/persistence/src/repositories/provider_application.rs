//! Provider application repository for database operations.

use async_trait::async_trait;
use domain::models::{Decision, NewProviderApplication, ProviderApplication};
use domain::services::{ProviderApplicationStore, StoreError};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::store_error;
use crate::entities::{ProviderApplicationEntity, RequestStatusDb};
use crate::metrics::QueryTimer;

#[derive(Clone)]
pub struct ProviderApplicationRepository {
    pool: PgPool,
}

impl ProviderApplicationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProviderApplicationStore for ProviderApplicationRepository {
    async fn insert(
        &self,
        new: NewProviderApplication,
    ) -> Result<ProviderApplication, StoreError> {
        let timer = QueryTimer::new("insert_provider_application");
        let result = sqlx::query_as::<_, ProviderApplicationEntity>(
            r#"
            INSERT INTO provider_applications (user_id, company_name, status, request_date)
            VALUES ($1, $2, 'pending', $3)
            RETURNING id, user_id, company_name, status, request_date, response_date, admin_notes
            "#,
        )
        .bind(new.user_id)
        .bind(&new.company_name)
        .bind(new.requested_at)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result.map(Into::into).map_err(store_error)
    }

    async fn record_decision(
        &self,
        id: Uuid,
        decision: &Decision,
    ) -> Result<Option<ProviderApplication>, StoreError> {
        let timer = QueryTimer::new("decide_provider_application");
        let result = sqlx::query_as::<_, ProviderApplicationEntity>(
            r#"
            UPDATE provider_applications
            SET status = $2, response_date = $3, admin_notes = $4
            WHERE id = $1
            RETURNING id, user_id, company_name, status, request_date, response_date, admin_notes
            "#,
        )
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
