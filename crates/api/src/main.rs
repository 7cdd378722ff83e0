use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use cropmate_api::app::{self, Backends};
use cropmate_api::config::Config;
use cropmate_api::middleware;
use cropmate_api::services::EmailService;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = Config::load()?;

    middleware::init_logging(&config.logging).context("Failed to initialize logging")?;
    middleware::init_metrics().context("Failed to install Prometheus recorder")?;

    info!("Starting CropMate API v{}", env!("CARGO_PKG_VERSION"));

    let db_config: persistence::db::DatabaseConfig = (&config.database).into();
    let pool = persistence::db::create_pool(&db_config).await?;

    info!("Running database migrations...");
    sqlx::migrate!("../persistence/src/migrations")
        .run(&pool)
        .await?;
    info!("Migrations completed");

    let email = EmailService::new(config.email.clone())?;
    info!(
        provider = %config.email.provider,
        enabled = email.is_enabled(),
        "Email transport ready"
    );

    let addr = config.socket_addr()?;
    let app = app::create_app(config, Backends::postgres(pool), Arc::new(email))?;

    info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
