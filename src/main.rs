use anyhow::Context;
use tracing_subscriber::EnvFilter;

use recipe_api::config;
use recipe_api::database::DatabaseManager;
use recipe_api::{is_development, router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, SECURITY_JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter())),
        )
        .init();

    tracing::info!("Starting Recipe API in {:?} mode", config.environment);
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("invalid configuration: {e}"))?;

    let store = DatabaseManager::open_store(config)
        .await
        .context("failed to open store")?;
    let app = router(AppState::new(store));

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    tracing::info!("Recipe API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Shut down cleanly");
    Ok(())
}

fn default_filter() -> &'static str {
    let config = config::config();
    match (config.api.enable_request_logging, is_development!()) {
        (true, true) => "recipe_api=debug,tower_http=debug",
        (true, false) => "recipe_api=info,tower_http=debug",
        (false, _) => "recipe_api=info,tower_http=info",
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
