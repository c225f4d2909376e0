// src/bin/api_server.rs

use cafe_finder::storage::{CafeStore, MemoryCafeStore, PostgresCafeStore};
use cafe_finder::transport;
use cafe_finder::{ApiDocumentation, AppConfig, CafeService};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // --- Configuration (read once, passed explicitly) ---
    let config = AppConfig::from_env()
        .inspect_err(|e| tracing::error!("Failed to load configuration: {:#}", e))?;
    let documentation = ApiDocumentation::load(&config.documentation_path)?;
    tracing::info!(
        endpoints = documentation.endpoints.len(),
        "API documentation loaded"
    );

    // --- Store Initialization ---
    let store: Arc<dyn CafeStore> = if config.uses_memory_store() {
        tracing::warn!("DATABASE_URL=memory: cafes will not survive a restart");
        Arc::new(MemoryCafeStore::new())
    } else {
        let store = PostgresCafeStore::connect(&config.database_url, config.max_connections)
            .await
            .inspect_err(|e| tracing::error!("Failed to connect to the database: {:#}", e))?;
        tracing::info!("Connected to the database, cafe table ready");
        Arc::new(store)
    };

    let app_state = transport::http::AppState {
        service: Arc::new(CafeService::new(store, config.api_key.clone())),
        documentation: Arc::new(documentation),
    };

    // --- API Server Initialization ---
    let app = transport::http::create_app(app_state);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("API server listening on http://{}", listener.local_addr()?);
    tracing::info!("Swagger UI available at /swagger-ui");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Shutdown signal received (Ctrl+C)");
            }
        })
        .await?;

    tracing::info!("Graceful shutdown complete.");
    Ok(())
}
