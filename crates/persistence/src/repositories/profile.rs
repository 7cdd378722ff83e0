//! Profile repository for database operations.

use async_trait::async_trait;
use domain::models::{Credentials, NewProfile, Profile};
use domain::services::{ProfileStore, StoreError};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::store_error;
use crate::entities::{CredentialsEntity, ProfileEntity, ProfileRoleDb};
use crate::metrics::QueryTimer;

/// Repository for the profiles table.
#[derive(Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for ProfileRepository {
    async fn create(&self, new: NewProfile) -> Result<Profile, StoreError> {
        let timer = QueryTimer::new("create_profile");
        let result = sqlx::query_as::<_, ProfileEntity>(
            r#"
            INSERT INTO profiles (user_id, full_name, email, phone, role, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING user_id, full_name, email, phone, role, created_at
            "#,
        )
        .bind(new.user_id)
        .bind(new.full_name.as_deref())
        .bind(&new.email)
        .bind(new.phone.as_deref())
        .bind(ProfileRoleDb::from(new.role))
        .bind(&new.password_hash)
        .bind(new.created_at)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result.map(Into::into).map_err(store_error)
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<Profile>, StoreError> {
        let timer = QueryTimer::new("find_profile_by_user_id");
        let result = sqlx::query_as::<_, ProfileEntity>(
            r#"
            SELECT user_id, full_name, email, phone, role, created_at
            FROM profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result.map(|row| row.map(Into::into)).map_err(store_error)
    }

    async fn find_by_user_ids(&self, user_ids: &[Uuid]) -> Result<Vec<Profile>, StoreError> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let timer = QueryTimer::new("find_profiles_by_user_ids");
        let result = sqlx::query_as::<_, ProfileEntity>(
            r#"
            SELECT user_id, full_name, email, phone, role, created_at
            FROM profiles
            WHERE user_id = ANY($1)
            "#,
        )
        .bind(user_ids)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
            .map(|rows| rows.into_iter().map(Into::into).collect())
            .map_err(store_error)
    }

    async fn list_all(&self) -> Result<Vec<Profile>, StoreError> {
        let timer = QueryTimer::new("list_profiles");
        let result = sqlx::query_as::<_, ProfileEntity>(
            r#"
            SELECT user_id, full_name, email, phone, role, created_at
            FROM profiles
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
            .map(|rows| rows.into_iter().map(Into::into).collect())
            .map_err(store_error)
    }

    async fn find_credentials(&self, email: &str) -> Result<Option<Credentials>, StoreError> {
        let timer = QueryTimer::new("find_profile_credentials");
        let result = sqlx::query_as::<_, CredentialsEntity>(
            "SELECT user_id, password_hash FROM profiles WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result.map(|row| row.map(Into::into)).map_err(store_error)
    }
}
