//! Allocator configurator bridge.
//!
//! Accepts multipart hook requests from the external configurator and
//! routes them: decoration values (task labels, executor environment) land
//! in per-kind rendezvous mailboxes that allocator worker threads block on,
//! and slave snapshots are forwarded to the allocator's mutation interface.

use std::sync::Arc;

use anyhow::Result;
use bridge_handoff::DecorationHub;
use bridge_server::{
    allocator::{Allocator, AllocatorGateway, LogAllocator},
    api,
    config::Config,
    state::AppState,
};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<()> {
    let config = Config::parse();

    // Prefer RUST_LOG, fall back to the configured level.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| config.log_level.clone().into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.worker_threads())
        .enable_all()
        .build()?;
    runtime.block_on(run(config))
}

async fn run(config: Config) -> Result<()> {
    info!("Starting allocator bridge");
    info!(
        listen_addr = %config.listen_addr(),
        threads = config.worker_threads(),
        "Configuration loaded"
    );

    // The standalone binary has no embedded allocator; calls are logged and
    // dropped. An embedding allocator process constructs its own gateway
    // and keeps the hub for the blocking wait_for_* side.
    let hub = Arc::new(DecorationHub::new());
    let allocator: Arc<dyn Allocator> = Arc::new(LogAllocator);
    let state = AppState::new(Arc::clone(&hub), AllocatorGateway::new(allocator));

    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(config.listen_addr()).await?;
    info!(addr = %config.listen_addr(), "Listening for hook requests");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Bridge shutdown complete");
    Ok(())
}

/// Completes when SIGINT or SIGTERM arrives.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(sigterm) => sigterm,
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                let _ = tokio::signal::ctrl_c().await;
                return;
            }
        };

        tokio::select! {
            _ = tokio::signal::ctrl_c() => info!("Received SIGINT"),
            _ = sigterm.recv() => info!("Received SIGTERM"),
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
        info!("Received shutdown signal");
    }
}
