//! Linkkeeper - A short link server
//!
//! Binary entry point: wires configuration, the link store, the reaper and
//! the HTTP router together.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use linkkeeper::api::{create_router, AppState};
use linkkeeper::tasks::{spawn_reaper, ReaperHandle};
use linkkeeper::{Config, LinkStore};

/// Main entry point for the link server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Load the link store from the data file
/// 4. Start the background reaper
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "linkkeeper=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Linkkeeper");

    let config = Config::from_env();
    info!(
        "Configuration loaded: code_length={}, default_ttl={}s, default_max_clicks={}, data_file={}, port={}, cleanup_interval={}s",
        config.shortcode_length,
        config.default_ttl_seconds,
        config.default_max_clicks,
        config.data_file.display(),
        config.server_port,
        config.cleanup_interval
    );

    let store = Arc::new(LinkStore::open(config.data_file.clone()).await);
    info!("Link store loaded with {} links", store.len().await);

    let reaper = spawn_reaper(store.clone(), Duration::from_secs(config.cleanup_interval));
    info!("Background reaper started");

    let app = create_router(AppState::from_config(store.clone(), &config));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(reaper))
        .await
        .context("server error")?;

    // Final flush so the file reflects the last state even if a write failed earlier
    if let Err(e) = store.save().await {
        error!("Final save failed: {}", e);
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then stops the reaper.
async fn shutdown_signal(reaper: ReaperHandle) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
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

    reaper.shutdown().await;
}
