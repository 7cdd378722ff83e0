use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use domain::services::{
    ChangeFeed, DecisionNotifier, EmailTransport, InMemoryStore, ProfileStore,
    ProviderApplicationStore, RentalRequestStore, RentalWorkflow, SessionStore, StoreHealth,
};
use persistence::db::PgHealth;
use persistence::repositories::{
    ProfileRepository, ProviderApplicationRepository, RentalRequestRepository, SessionRepository,
};
use shared::jwt::JwtError;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, rate_limit_middleware, require_user,
    security_headers_middleware, trace_id, RateLimiterState,
};
use crate::routes::{
    admin_customers, admin_rental_requests, auth, health, me, provider_applications,
    rental_requests, request_decisions,
};
use crate::services::AuthService;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub auth: AuthService,
    pub workflow: RentalWorkflow,
    pub notifier: DecisionNotifier,
    pub changes: ChangeFeed,
    pub health: Arc<dyn StoreHealth>,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
}

/// Storage implementations the application runs against.
#[derive(Clone)]
pub struct Backends {
    pub rentals: Arc<dyn RentalRequestStore>,
    pub providers: Arc<dyn ProviderApplicationStore>,
    pub profiles: Arc<dyn ProfileStore>,
    pub sessions: Arc<dyn SessionStore>,
    pub health: Arc<dyn StoreHealth>,
}

impl Backends {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            rentals: Arc::new(RentalRequestRepository::new(pool.clone())),
            providers: Arc::new(ProviderApplicationRepository::new(pool.clone())),
            profiles: Arc::new(ProfileRepository::new(pool.clone())),
            sessions: Arc::new(SessionRepository::new(pool.clone())),
            health: Arc::new(PgHealth::new(pool)),
        }
    }

    /// Every relation backed by one shared in-process store.
    pub fn in_memory(store: InMemoryStore) -> Self {
        Self {
            rentals: Arc::new(store.clone()),
            providers: Arc::new(store.clone()),
            profiles: Arc::new(store.clone()),
            sessions: Arc::new(store.clone()),
            health: Arc::new(store),
        }
    }
}

pub fn create_app(
    config: Config,
    backends: Backends,
    transport: Arc<dyn EmailTransport>,
) -> Result<Router, JwtError> {
    let config = Arc::new(config);

    let jwt = Arc::new(AuthService::jwt_from_config(&config.jwt)?);
    let auth = AuthService::new(
        backends.profiles.clone(),
        backends.sessions.clone(),
        jwt,
        &config.admin,
    );

    // One feed per process; every service publishes to the same sender.
    let changes = ChangeFeed::new(config.notifications.change_feed_capacity);

    let notifier = DecisionNotifier::new(
        backends.rentals.clone(),
        backends.providers.clone(),
        backends.profiles.clone(),
        transport,
        changes.clone(),
    );

    let mut workflow = RentalWorkflow::new(
        backends.rentals.clone(),
        backends.providers.clone(),
        backends.profiles.clone(),
        changes.clone(),
    );
    if config.notifications.notify_on_review_decision {
        workflow = workflow.with_notifier(notifier.clone());
    }

    let rate_limiter =
        RateLimiterState::new(config.security.rate_limit_per_minute).map(Arc::new);

    let state = AppState {
        config: config.clone(),
        auth,
        workflow,
        notifier,
        changes,
        health: backends.health,
        rate_limiter,
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Signed-in user routes.
    // Middleware order: require_user runs first, then rate limiting (which needs the session)
    let user_routes = Router::new()
        .route("/api/v1/auth/session", get(auth::session))
        .route("/api/v1/auth/logout", post(auth::logout))
        .route(
            "/api/v1/rental-requests",
            post(rental_requests::submit_rental_request),
        )
        .route("/api/v1/me/profile", get(me::profile))
        .route("/api/v1/me/rental-requests", get(me::rental_history))
        .route(
            "/api/v1/me/rental-requests/events",
            get(me::rental_request_events),
        )
        .route(
            "/api/v1/provider-applications",
            post(provider_applications::submit_provider_application),
        )
        .route(
            "/api/v1/admin/rental-requests",
            get(admin_rental_requests::review_queue),
        )
        .route(
            "/api/v1/admin/rental-requests/:id/decision",
            post(admin_rental_requests::decide),
        )
        .route("/api/v1/admin/customers", get(admin_customers::list_customers))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_user));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    // The decision notifier answers browsers with its own fixed CORS headers,
    // so it is merged after the CORS layer has been applied.
    let notifier_routes = Router::new().route(
        "/api/v1/request-decisions",
        post(request_decisions::send_request_notification)
            .options(request_decisions::preflight),
    );

    let router = Router::new()
        .merge(public_routes)
        .merge(user_routes)
        .layer(cors)
        .merge(notifier_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(CompressionLayer::new())
        .layer(DefaultBodyLimit::max(config.server.max_body_size))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .with_state(state);

    Ok(router)
}
