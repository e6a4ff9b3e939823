//! Snapcache - a bounded in-memory TTL cache service
//!
//! Provides per-entry expiration, LRU eviction, and snapshot persistence
//! behind a small REST API.

use std::net::SocketAddr;

use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use snapcache::api::create_router;
use snapcache::{AppState, Config};

/// Main entry point for the Snapcache service.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the cache wired to the file-backed snapshot store
/// 4. Restore still-fresh entries from the last snapshot
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured port
/// 7. On SIGINT/SIGTERM, persist a snapshot and shut down
#[tokio::main]
async fn main() {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "snapcache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Snapcache");

    // Load configuration from environment variables
    let config = Config::from_env();
    info!(
        "Configuration loaded: capacity={}, default_ttl_ms={}, port={}, snapshot_dir={}",
        config.capacity,
        config.default_ttl_ms,
        config.server_port,
        config.snapshot_dir.display()
    );

    // Create application state with the snapshot-backed cache
    let state = AppState::from_config(&config);
    info!("Cache initialized");

    // Warm start: restore whatever the last snapshot still has to offer
    state.cache.write().await.load_from_storage();

    // Create router with all endpoints
    let app = create_router(state.clone());

    // Bind to configured port
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    info!("Server listening on http://{}", addr);

    // Start server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    // Best-effort snapshot on the way down so the next start is warm
    info!("Persisting cache snapshot before exit");
    state.cache.read().await.persist_to_storage(None);

    info!("Server shutdown complete");
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
