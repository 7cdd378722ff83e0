//! Per-user rate limiting on authenticated routes.

use std::num::NonZeroU32;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use domain::models::Session;
use governor::{
    clock::{Clock, DefaultClock},
    DefaultKeyedRateLimiter, Quota, RateLimiter,
};
use serde_json::json;
use uuid::Uuid;

use crate::app::AppState;
use crate::middleware::trace_id::get_request_id;

/// Token buckets keyed by user id.
pub struct RateLimiterState {
    limiter: DefaultKeyedRateLimiter<Uuid>,
    clock: DefaultClock,
    rate_limit_per_minute: u32,
}

impl RateLimiterState {
    /// Returns `None` when `rate_limit_per_minute` is 0 (limiting disabled).
    pub fn new(rate_limit_per_minute: u32) -> Option<Self> {
        let per_minute = NonZeroU32::new(rate_limit_per_minute)?;
        Some(Self {
            limiter: RateLimiter::keyed(Quota::per_minute(per_minute)),
            clock: DefaultClock::default(),
            rate_limit_per_minute,
        })
    }

    /// `Err` carries the retry-after delay in whole seconds, at least 1.
    pub fn check(&self, user_id: Uuid) -> Result<(), u64> {
        self.limiter.check_key(&user_id).map_err(|not_until| {
            not_until
                .wait_time_from(self.clock.now())
                .as_secs()
                .max(1)
        })
    }
}

impl std::fmt::Debug for RateLimiterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiterState")
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .field("tracked_users", &self.limiter.len())
            .finish()
    }
}

/// Must run after `require_user`, which puts the [`Session`] in extensions.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let (Some(limiter), Some(session)) = (
        state.rate_limiter.as_ref(),
        req.extensions().get::<Session>(),
    ) else {
        return next.run(req).await;
    };

    if let Err(retry_after) = limiter.check(session.user_id) {
        tracing::warn!(
            user_id = %session.user_id,
            request_id = %get_request_id(req.extensions()),
            retry_after,
            "Rate limit exceeded"
        );
        return rate_limited_response(limiter.rate_limit_per_minute, retry_after);
    }

    next.run(req).await
}

fn rate_limited_response(limit: u32, retry_after: u64) -> Response {
    let body = json!({
        "error": "rate_limited",
        "message": format!("Rate limit of {} requests/minute exceeded", limit),
        "retry_after": retry_after
    });

    let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
    response
        .headers_mut()
        .insert(header::RETRY_AFTER, HeaderValue::from(retry_after));
    response
}
