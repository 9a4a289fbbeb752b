use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use fornace::{
    config::AppConfig,
    jwt::JwtService,
    notify::LogNotifier,
    routes,
    state::AppState,
    store::MemoryStore,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting La Fornace order service");

    let config = AppConfig::from_env();
    let jwt_service = JwtService::new(&config.jwt);

    let store = MemoryStore::new();
    store.seed_demo_menu().await;

    let state = AppState::new(store, jwt_service, Arc::new(LogNotifier));

    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("Order service listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
