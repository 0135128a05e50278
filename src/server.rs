//! Server startup and shutdown logic.
//!
//! This module contains the `run_server` function which handles:
//! - Key-value backend initialization
//! - Link store and application state creation
//! - Router creation
//! - Server binding and graceful shutdown

use crate::auth::BasicAuth;
use crate::config::{BackendKind, Config};
use crate::error::{AppError, AppResult};
use crate::kv::{KvBackend, MemoryBackend, RedisBackend};
use crate::routes;
use crate::services::{LinkRepository, LinkStore, NanoidGenerator};
use crate::state;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Backend and link store built from configuration.
pub struct Store {
    pub backend: Arc<dyn KvBackend>,
    pub links: Arc<dyn LinkRepository>,
}

/// Build the configured key-value backend and the link store on top of it.
pub fn open_store(config: &Config) -> AppResult<Store> {
    let backend: Arc<dyn KvBackend> = match config.store.backend {
        BackendKind::Redis => Arc::new(
            RedisBackend::new(&config.store.redis_url, config.store.max_connections)
                .map_err(AppError::Configuration)?,
        ),
        BackendKind::Memory => {
            warn!("Using in-memory store; links will not survive a restart");
            Arc::new(MemoryBackend::new())
        }
    };

    let generator = NanoidGenerator::new(config.url.short_code_length);
    let links = LinkStore::new(backend.clone(), generator)
        .with_collection(config.store.collection.clone())
        .with_max_attempts(config.url.short_code_max_attempts)
        .with_timeout(config.store_timeout());

    Ok(Store {
        backend,
        links: Arc::new(links),
    })
}

/// Run the web server with the given configuration.
///
/// # Arguments
///
/// * `config` - The application configuration
/// * `addr` - The address to bind the server to (e.g., "127.0.0.1:3000")
///
/// # Errors
///
/// This function will return an error if:
/// - The backend cannot be configured
/// - Server binding fails
/// - Server runtime error occurs
///
/// An unreachable store at startup is logged but not fatal; requests will
/// fail with storage errors until it comes back.
pub async fn run_server(config: Config, addr: String) -> AppResult<()> {
    info!("Starting redlink server...");

    info!(backend = ?config.store.backend, collection = %config.store.collection, "Opening link store");
    let store = open_store(&config)?;

    match store.backend.ping().await {
        Ok(_) => info!("Store connection verified"),
        Err(e) => warn!(error = %e, "Store ping failed. Continuing; requests will retry the connection."),
    }

    let state = Arc::new(state::AppState {
        links: store.links,
        backend: store.backend,
        basic_auth: BasicAuth::from_config(&config.auth),
        strict_url_validation: config.url.strict_url_validation,
    });

    let app = routes::create_router(state, &config.cors, config.server.max_body_bytes);

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to bind to address {}: {}", addr, e)))?;

    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(create_shutdown_signal())
        .await
        .map_err(|e| AppError::Internal(format!("Server error: {}", e)))?;

    info!("Server shutdown complete");
    Ok(())
}

/// Create a future that resolves when a shutdown signal is received.
///
/// On Unix-like systems, this listens for both Ctrl+C (SIGINT) and SIGTERM.
/// On other platforms, it only listens for Ctrl+C.
///
/// # Panics
///
/// Panics if signal handler installation fails.
async fn create_shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    #[cfg(not(unix))]
    ctrl_c.await;

    info!("Shutdown signal received");
}
