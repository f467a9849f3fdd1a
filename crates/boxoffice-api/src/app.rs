//! Application builder: wires router, middleware, state and the expiry
//! reaper into a running server.

use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use boxoffice_core::config::{AppConfig, CorsConfig, StoreProvider};
use boxoffice_core::error::{AppError, ErrorKind};
use boxoffice_core::result::AppResult;
use boxoffice_database::DatabasePool;
use boxoffice_database::migration::run_migrations;
use boxoffice_database::store::build_store;
use boxoffice_lock::LockManager;
use boxoffice_worker::{ExpiryReaper, ReaperHandle, ReaperRunner};

use crate::middleware::cors::build_cors_layer;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState, cors_config: &CorsConfig) -> Router {
    build_router(state)
        .layer(build_cors_layer(cors_config))
        .layer(TraceLayer::new_for_http())
}

/// Runs the BoxOffice server until a shutdown signal arrives.
pub async fn run_server(config: AppConfig) -> AppResult<()> {
    info!(version = env!("CARGO_PKG_VERSION"), "Starting BoxOffice server");
    let config = Arc::new(config);

    // Record store
    let db_pool = match config.store.provider {
        StoreProvider::Postgres => {
            let pool = DatabasePool::connect(&config.database).await?;
            if config.database.run_migrations {
                run_migrations(pool.pool()).await?;
            }
            Some(pool)
        }
        StoreProvider::Memory => {
            warn!("Using the in-memory record store; data will not survive a restart");
            None
        }
    };
    let store = build_store(&config.store, db_pool.as_ref())?;

    // Lock coordinator
    let locks = LockManager::new(&config.lock).await?;
    info!(provider = ?config.lock.provider, "Lock coordinator ready");

    let state = AppState::new(Arc::clone(&config), store, locks);

    // Expiry reaper
    let reaper = if config.reaper.enabled {
        let job = Arc::new(ExpiryReaper::new(
            Arc::clone(&state.store),
            state.locks.clone(),
            Arc::clone(&state.hub),
        ));
        Some(ReaperHandle::spawn(ReaperRunner::new(
            job,
            config.reaper.interval(),
        )))
    } else {
        info!("Expiry reaper disabled");
        None
    };

    let app = build_app(state, &config.server.cors);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        AppError::with_source(ErrorKind::Internal, format!("Failed to bind {addr}"), e)
    })?;
    info!(%addr, "BoxOffice listening");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    info!("Waiting for background tasks to complete...");
    if let Some(reaper) = reaper {
        let grace = std::time::Duration::from_secs(config.server.shutdown_grace_seconds);
        if tokio::time::timeout(grace, reaper.stop()).await.is_err() {
            warn!("Expiry reaper did not stop within the grace period");
        }
    }
    if let Some(pool) = db_pool {
        pool.close().await;
    }

    served.map_err(|e| AppError::with_source(ErrorKind::Internal, "Server error", e))?;
    info!("BoxOffice server shut down gracefully");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
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
                error!(error = %e, "Failed to install SIGTERM handler");
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

    info!("Shutdown signal received, starting graceful shutdown");
}
