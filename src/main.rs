use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use fieldops_api::app::{app, AppState};
use fieldops_api::config::AppConfig;
use fieldops_api::database::manager::DatabaseManager;
use fieldops_api::database::repository::PgRepository;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env();
    config.validate()?;
    tracing::info!("Starting FieldOps API in {:?} mode", config.environment);

    let pool = DatabaseManager::connect(&config.database)?;
    let store = Arc::new(PgRepository::new(pool.clone(), &config.database));

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let state = AppState::new(config, store);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("FieldOps API listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    DatabaseManager::close(&pool).await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
