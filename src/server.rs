//! HTTP server initialization and runtime setup.
//!
//! Handles store selection, migrations, the rate limiter, the click worker,
//! and the Axum server lifecycle including graceful shutdown.

use crate::application::services::{AuthService, ClickRecorder, LinkService};
use crate::config::Config;
use crate::domain::click_worker::run_click_worker;
use crate::domain::rate_limiter::TokenBucketLimiter;
use crate::domain::repositories::{ClickRepository, LinkRepository};
use crate::infrastructure::persistence::{
    InMemoryClickRepository, InMemoryLinkRepository, PgClickRepository, PgLinkRepository,
};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tower::Layer;
use tower_http::normalize_path::NormalizePathLayer;

/// Store backends selected at startup.
struct Repositories {
    links: Arc<dyn LinkRepository>,
    clicks: Arc<dyn ClickRepository>,
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool and migrations, or the in-memory store
/// - Token bucket rate limiter and its eviction sweep
/// - Background click worker
/// - Axum HTTP server
///
/// On Ctrl-C or SIGTERM the server stops accepting connections, finishes
/// in-flight requests, stops the limiter sweep, and waits up to
/// `SHUTDOWN_DRAIN_SECS` for queued click jobs to be written.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let repositories = connect_store(&config).await?;

    let rate_limiter = TokenBucketLimiter::new(config.rate_limiter());

    let (click_tx, click_rx) = mpsc::channel(config.click_queue_capacity);
    let worker = tokio::spawn(run_click_worker(
        click_rx,
        repositories.links.clone(),
        repositories.clicks,
        config.click_worker_concurrency,
    ));
    tracing::info!("Click worker started");

    let link_service = Arc::new(LinkService::new(
        repositories.links,
        config.store_timeout(),
    ));
    let state = AppState::new(
        link_service,
        ClickRecorder::new(click_tx),
        AuthService::new(config.api_key.clone()),
        rate_limiter.clone(),
        config.trusted_proxy,
    );

    let app = NormalizePathLayer::trim_trailing_slash()
        .layer(app_router(state, &config.cors_origins));

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("HTTP server stopped");
    rate_limiter.stop();

    // The server owned the last click sender; the worker now drains and exits.
    drain_click_worker(worker, config.shutdown_drain()).await;

    Ok(())
}

async fn connect_store(config: &Config) -> Result<Repositories> {
    let Some(database_url) = &config.database_url else {
        tracing::warn!("No database configured, using in-memory store; data is lost on restart");
        return Ok(Repositories {
            links: Arc::new(InMemoryLinkRepository::new()),
            clicks: Arc::new(InMemoryClickRepository::new()),
        });
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations applied");

    let pool = Arc::new(pool);
    Ok(Repositories {
        links: Arc::new(PgLinkRepository::new(pool.clone())),
        clicks: Arc::new(PgClickRepository::new(pool)),
    })
}

async fn drain_click_worker(worker: tokio::task::JoinHandle<()>, budget: Duration) {
    match tokio::time::timeout(budget, worker).await {
        Ok(Ok(())) => tracing::info!("Click queue drained"),
        Ok(Err(e)) => tracing::error!(error = %e, "Click worker panicked"),
        Err(_) => tracing::warn!(
            budget_secs = budget.as_secs(),
            "Click queue not drained before shutdown deadline"
        ),
    }
}

/// Resolves on Ctrl-C, or on SIGTERM on Unix.
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
