//! Echo Chamber Network Server - Main Entry Point

use std::sync::Arc;

use anyhow::Result;
use sqlx::PgPool;
use tracing::info;

use ecn_server::config::{Config, StoreBackend};
use ecn_server::store::{MemoryStore, Store};
use ecn_server::{api, db};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ecn_server=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting Echo Chamber Network server"
    );

    // Initialize persistence. The pool is kept so it can be closed on exit.
    let mut pool: Option<PgPool> = None;
    let store: Arc<dyn Store> = match config.store_backend() {
        StoreBackend::Memory => {
            info!("Using in-memory store");
            Arc::new(MemoryStore::new())
        }
        StoreBackend::Postgres => {
            let db_pool = db::create_pool(&config.database_url, config.max_connections).await?;
            db::run_migrations(&db_pool).await?;
            pool = Some(db_pool.clone());
            Arc::new(db::PgStore::new(db_pool))
        }
    };

    let bind_address = config.bind_address.clone();
    let state = api::AppState::new(store, config);
    let app = api::create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!(address = %bind_address, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(pool) = pool {
        pool.close().await;
        info!("Database pool closed");
    }

    info!("Server shutdown complete");

    Ok(())
}

/// Resolve on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Received shutdown signal, cleaning up...");
}
