use anyhow::Context;
use std::sync::Arc;
use tracing::{info, warn};

use crate::app::{app, AppState};
use crate::config::{self, StoreBackend};
use crate::database::{DatabaseManager, MemoryStore, PgStore, Store};

/// Open the configured store. Postgres waits for readiness and migrates first.
pub async fn open_store() -> anyhow::Result<Arc<dyn Store>> {
    let cfg = config::config();
    match cfg.api.store_backend {
        StoreBackend::Postgres => {
            let pool = DatabaseManager::wait_until_ready(&cfg.database).await?;
            DatabaseManager::migrate(&pool).await?;
            Ok(Arc::new(PgStore::new(pool)))
        }
        StoreBackend::Memory => {
            warn!("Using in-memory store; all data is lost on exit");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

pub async fn handle(port: Option<u16>) -> anyhow::Result<()> {
    let cfg = config::config();
    info!("Starting Recipe API in {:?} mode", cfg.environment);

    if cfg.security.jwt_secret.is_empty() {
        anyhow::bail!("JWT_SECRET must be set outside development");
    }
    if crate::is_production!() && cfg.api.store_backend == StoreBackend::Memory {
        anyhow::bail!("STORE_BACKEND=memory is not allowed in production");
    }

    let store = open_store().await?;
    let router = app(AppState::new(store));

    let port = port.unwrap_or(cfg.api.port);
    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!("Recipe API listening on http://{}", bind_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Recipe API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
