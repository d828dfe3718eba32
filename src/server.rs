//! HTTP server initialization and runtime setup.
//!
//! Handles storage selection, database connections, service wiring, and Axum
//! server lifecycle.

use crate::config::{Config, StorageBackend, mask_connection_string};
use crate::domain::repositories::{LinkRepository, OwnerRepository};
use crate::infrastructure::memory::{MemoryLinkRepository, MemoryOwnerRepository};
use crate::infrastructure::persistence::{PgLinkRepository, PgOwnerRepository};
use crate::routes::app_router;
use crate::state::AppState;
use crate::utils::code_generator::CodeGenerator;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

type Stores = (Arc<dyn LinkRepository>, Arc<dyn OwnerRepository>);

/// Opens the PostgreSQL pool with the configured limits and applies the
/// embedded migrations.
pub async fn connect_database(config: &Config, database_url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(database_url)
        .await
        .with_context(|| {
            format!(
                "Failed to connect to {}",
                mask_connection_string(database_url)
            )
        })?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to apply migrations")?;
    tracing::info!("Migrations applied");

    Ok(pool)
}

async fn build_stores(config: &Config) -> Result<Stores> {
    match config.storage_backend {
        StorageBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is required for the postgres storage backend")?;
            let pool = Arc::new(connect_database(config, database_url).await?);

            let links: Arc<dyn LinkRepository> = Arc::new(PgLinkRepository::new(pool.clone()));
            let owners: Arc<dyn OwnerRepository> = Arc::new(PgOwnerRepository::new(pool));
            Ok((links, owners))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage, data will be lost on restart");
            let links: Arc<dyn LinkRepository> = Arc::new(MemoryLinkRepository::new());
            let owners: Arc<dyn OwnerRepository> =
                Arc::new(MemoryOwnerRepository::new(links.clone()));
            Ok((links, owners))
        }
    }
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Link and owner stores (PostgreSQL with migrations, or in-memory)
/// - Services and shared state
/// - Axum HTTP server with graceful shutdown on Ctrl+C / SIGTERM
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let (links, owners) = build_stores(&config).await?;

    if config.base_url.is_none() {
        tracing::warn!("BASE_URL is not set, link creation will fail until it is configured");
    }

    let state = AppState::new(
        links,
        owners,
        CodeGenerator::os(),
        config.base_url.clone(),
        config.token_signing_secret.clone(),
    );

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
