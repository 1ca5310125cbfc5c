//! Product API server: loads settings, prepares the store, and serves the router.

use product_api::{
    build_router, ensure_database_exists, ensure_products_table, AppState, DynDataStore, MemoryStore, PgStore,
    Settings, StoreKind,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("product_api=info,tower_http=info")),
        )
        .init();

    let store: DynDataStore = match settings.store {
        StoreKind::Postgres => {
            if settings.auto_create_database {
                ensure_database_exists(&settings.database_url).await?;
            }
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(settings.db_max_connections)
                .acquire_timeout(settings.db_acquire_timeout)
                .connect(&settings.database_url)
                .await?;
            ensure_products_table(&pool).await?;
            Arc::new(PgStore::new(pool))
        }
        StoreKind::Memory => {
            tracing::warn!("using in-memory store; data is lost on exit");
            Arc::new(MemoryStore::new())
        }
    };

    let app = build_router(AppState::new(store), settings.request_body_limit);

    let listener = TcpListener::bind(&settings.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
