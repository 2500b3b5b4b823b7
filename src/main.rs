mod app;
mod auth;
mod config;
mod db;
mod dto;
mod error;
mod handlers;

use app::build_router;
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub fn setup_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        // Si RUST_LOG n'est pas défini, utiliser ces règles par défaut
        tracing_subscriber::EnvFilter::new(
            "info,receipt_service=debug,hyper_util=warn,tower_http=info",
        )
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

// ----------------- Main -----------------

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_logging();
    tracing::info!("Starting receipt-service...");

    let config = Config::from_env()?;
    tracing::info!("Running in {} mode", config.environment.as_str());

    db::connection::init_pool(&config.database_url)?;

    let jwt_manager = auth::jwt::JwtManager::new(&config.jwt_secret, config.access_token_ttl_minutes);
    let app = build_router(jwt_manager);

    let addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server running at http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
