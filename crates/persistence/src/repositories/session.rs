//! Session repository backing issued access tokens.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::models::NewSession;
use domain::services::{SessionStore, StoreError};
use sqlx::PgPool;

use crate::db::store_error;
use crate::entities::SessionEntity;
use crate::metrics::QueryTimer;

#[derive(Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for SessionRepository {
    async fn create(&self, session: NewSession) -> Result<(), StoreError> {
        let timer = QueryTimer::new("create_session");
        let result = sqlx::query(
            r#"
            INSERT INTO sessions (jti, user_id, created_at, expires_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&session.jti)
        .bind(session.user_id)
        .bind(session.created_at)
        .bind(session.expires_at)
        .execute(&self.pool)
        .await;
        timer.record();
        result.map(|_| ()).map_err(store_error)
    }

    async fn is_active(&self, jti: &str, now: DateTime<Utc>) -> Result<bool, StoreError> {
        let timer = QueryTimer::new("find_session");
        let result = sqlx::query_as::<_, SessionEntity>(
            r#"
            SELECT jti, user_id, created_at, expires_at, revoked_at
            FROM sessions
            WHERE jti = $1
            "#,
        )
        .bind(jti)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
            .map(|row| row.is_some_and(|s| s.is_active_at(now)))
            .map_err(store_error)
    }

    async fn revoke(&self, jti: &str, now: DateTime<Utc>) -> Result<bool, StoreError> {
        let timer = QueryTimer::new("revoke_session");
        let result = sqlx::query(
            "UPDATE sessions SET revoked_at = $2 WHERE jti = $1 AND revoked_at IS NULL",
        )
        .bind(jti)
        .bind(now)
        .execute(&self.pool)
        .await;
        timer.record();
        result
            .map(|done| done.rows_affected() > 0)
            .map_err(store_error)
    }
}
