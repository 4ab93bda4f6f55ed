/// Car Service - Main entry point
/// REST API for account registration, JWT login/logout and the cars resource
use actix_web::{web, App, HttpServer};
use anyhow::{anyhow, Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use car_service::{
    config::Config,
    db::{PgCarRepository, PgRevocationStore, PgUserRepository, RevocationStore},
    routes::configure_routes,
    security::JwtKeys,
    services::spawn_revocation_cleanup,
    AppState,
};
use db_pool::{create_pool, DbConfig};

#[actix_web::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "car_service=info,actix_web=info".into()),
        )
        .with_target(false)
        .json()
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;
    info!(?config, "Starting car-service v{}", env!("CARGO_PKG_VERSION"));

    let keys = JwtKeys::from_secret(&config.jwt_secret).context("Invalid JWT_SECRET")?;

    let db_config = DbConfig::from_env("car-service").map_err(|e| anyhow!(e))?;
    db_config.log_config();
    let db_pool = create_pool(db_config)
        .await
        .context("Failed to create database pool")?;

    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .context("Failed to run database migrations")?;
    info!("Database migrations completed");

    let revocations: Arc<dyn RevocationStore> = Arc::new(PgRevocationStore::new(db_pool.clone()));
    let state = AppState::new(
        Arc::new(PgUserRepository::new(db_pool.clone())),
        revocations.clone(),
        Arc::new(PgCarRepository::new(db_pool.clone())),
        keys,
        config.access_token_ttl(),
        config.jwt_leeway_secs,
    );

    if config.revocation_cleanup_interval_secs > 0 {
        spawn_revocation_cleanup(
            revocations,
            Duration::from_secs(config.revocation_cleanup_interval_secs),
            config.jwt_leeway_secs,
        );
        info!(
            interval_secs = config.revocation_cleanup_interval_secs,
            "Revocation cleanup task started"
        );
    }

    let bind_address = format!("{}:{}", config.app_host, config.app_port);
    info!("Starting HTTP server at {}", bind_address);

    let state = web::Data::new(state);
    HttpServer::new(move || {
        App::new()
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(|cfg| configure_routes(cfg, state.clone()))
    })
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run()
    .await
    .context("HTTP server error")?;

    Ok(())
}
