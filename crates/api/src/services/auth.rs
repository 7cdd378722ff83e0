//! Account registration, sign-in and session resolution.

use std::sync::Arc;

use chrono::Utc;
use domain::models::{NewProfile, NewSession, Profile, ProfileRole, Session};
use domain::services::{ProfileStore, SessionStore, StoreError};
use shared::jwt::{extract_user_id, JwtConfig, JwtError};
use shared::password::{hash_password, verify_password, PasswordError};
use shared::validation::{non_blank, normalize_email};
use thiserror::Error;
use uuid::Uuid;

use crate::config::{AdminConfig, JwtAuthConfig};
use crate::error::ApiError;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email already registered")]
    EmailAlreadyExists,

    #[error("Password does not meet requirements: {0}")]
    WeakPassword(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Session is not active")]
    SessionInactive,

    #[error("Profile missing for session user")]
    ProfileMissing,

    #[error("Token error: {0}")]
    Token(#[from] JwtError),

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::EmailAlreadyExists => ApiError::Conflict(err.to_string()),
            AuthError::WeakPassword(msg) => ApiError::Validation(msg),
            AuthError::InvalidCredentials => {
                ApiError::Unauthorized("Invalid email or password".into())
            }
            AuthError::SessionInactive | AuthError::ProfileMissing | AuthError::Token(_) => {
                ApiError::Unauthorized("Invalid or expired token".into())
            }
            AuthError::Password(e) => ApiError::Internal(e.to_string()),
            AuthError::Store(e) => e.into(),
        }
    }
}

/// A freshly issued access token for a profile.
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub access_token: String,
    pub expires_in: i64,
    pub profile: Profile,
}

/// Sign-up input, already shape-validated by the route.
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
}

#[derive(Clone)]
pub struct AuthService {
    profiles: Arc<dyn ProfileStore>,
    sessions: Arc<dyn SessionStore>,
    jwt: Arc<JwtConfig>,
    bootstrap_email: Option<String>,
}

impl AuthService {
    pub fn new(
        profiles: Arc<dyn ProfileStore>,
        sessions: Arc<dyn SessionStore>,
        jwt: Arc<JwtConfig>,
        admin: &AdminConfig,
    ) -> Self {
        Self {
            profiles,
            sessions,
            jwt,
            bootstrap_email: admin
                .bootstrap_email
                .as_deref()
                .map(normalize_email)
                .filter(|e| !e.is_empty()),
        }
    }

    /// Builds the RS256 signer from configuration.
    pub fn jwt_from_config(config: &JwtAuthConfig) -> Result<JwtConfig, JwtError> {
        JwtConfig::new(
            &config.private_key,
            &config.public_key,
            config.access_token_expiry_secs,
            config.leeway_secs,
        )
    }

    /// Creates a profile and signs the new user in.
    ///
    /// The configured bootstrap email receives the admin role; everyone
    /// else starts as a renter.
    pub async fn register(&self, input: Registration) -> Result<AuthResult, AuthError> {
        validate_password(&input.password)?;

        let email = normalize_email(&input.email);
        let role = if self.bootstrap_email.as_deref() == Some(email.as_str()) {
            ProfileRole::Admin
        } else {
            ProfileRole::Renter
        };

        let profile = self
            .profiles
            .create(NewProfile {
                user_id: Uuid::new_v4(),
                full_name: non_blank(input.full_name).map(|n| n.trim().to_string()),
                email,
                phone: non_blank(input.phone),
                role,
                password_hash: hash_password(&input.password)?,
                created_at: Utc::now(),
            })
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => AuthError::EmailAlreadyExists,
                other => AuthError::Store(other),
            })?;

        tracing::info!(user_id = %profile.user_id, role = %profile.role, "Account registered");
        self.start_session(profile).await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResult, AuthError> {
        let credentials = self
            .profiles
            .find_credentials(&normalize_email(email))
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &credentials.password_hash)? {
            tracing::info!(user_id = %credentials.user_id, "Login rejected: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let profile = self
            .profiles
            .find_by_user_id(credentials.user_id)
            .await?
            .ok_or(AuthError::ProfileMissing)?;

        self.start_session(profile).await
    }

    /// Turns a bearer token into the caller's [`Session`].
    ///
    /// The token must verify, its session record must be active and the
    /// role is read from the current profile, so role changes apply at once.
    pub async fn resolve_session(&self, token: &str) -> Result<Session, AuthError> {
        let claims = self.jwt.validate(token)?;
        let user_id = extract_user_id(&claims)?;

        if !self.sessions.is_active(&claims.jti, Utc::now()).await? {
            return Err(AuthError::SessionInactive);
        }

        let profile = self
            .profiles
            .find_by_user_id(user_id)
            .await?
            .ok_or(AuthError::ProfileMissing)?;

        Ok(Session::new(user_id, profile.role, claims.jti))
    }

    pub async fn logout(&self, session: &Session) -> Result<(), AuthError> {
        let revoked = self.sessions.revoke(&session.session_id, Utc::now()).await?;
        tracing::info!(user_id = %session.user_id, revoked, "Session ended");
        Ok(())
    }

    async fn start_session(&self, profile: Profile) -> Result<AuthResult, AuthError> {
        let issued = self.jwt.issue(profile.user_id)?;

        self.sessions
            .create(NewSession {
                jti: issued.jti,
                user_id: profile.user_id,
                created_at: Utc::now(),
                expires_at: issued.expires_at,
            })
            .await?;

        Ok(AuthResult {
            access_token: issued.token,
            expires_in: self.jwt.token_expiry_secs,
            profile,
        })
    }
}

fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < 8 {
        return Err(AuthError::WeakPassword(
            "Password must be at least 8 characters".to_string(),
        ));
    }
    if !password.chars().any(|c| c.is_alphabetic()) || !password.chars().any(|c| c.is_ascii_digit())
    {
        return Err(AuthError::WeakPassword(
            "Password must contain a letter and a digit".to_string(),
        ));
    }
    Ok(())
}
