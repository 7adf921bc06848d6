//! Peer Cache - A distributed lookaside cache node
//!
//! Runs one cache node: a single group backed by a seeded in-memory origin,
//! sharing keys with the configured peers over HTTP.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use peer_cache::api::create_router;
use peer_cache::{AppState, Config, GetterFn, Group, HttpPool};

/// Main entry point for the cache node.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the group backed by the seeded origin
/// 4. Build the peer pool and bind it to the group
/// 5. Start HTTP server on configured port
/// 6. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "peer_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Peer Cache node");

    let config = Config::from_env();
    info!(
        "Configuration loaded: group={}, cache_bytes={}, port={}, self={}, peers={:?}",
        config.group_name, config.cache_bytes, config.server_port, config.self_url, config.peers
    );

    let db: HashMap<String, String> = config.origin_seed.iter().cloned().collect();
    let group = Group::builder(config.group_name.clone())
        .cache_bytes(config.cache_bytes)
        .getter(GetterFn::new(move |key: &str| {
            info!("[SlowDB] search key {}", key);
            match db.get(key) {
                Some(value) => Ok(value.clone().into_bytes()),
                None => anyhow::bail!("{} not exist", key),
            }
        }))
        .build()?;

    let pool = Arc::new(HttpPool::with_options(
        config.self_url.clone(),
        config.base_path.clone(),
        config.replicas,
    ));
    pool.set_peers(&config.peers);
    group.register_peers(pool)?;

    let app = create_router(AppState::from_config(&config));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Node listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Node shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {}", err);
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
}
