//! # homesyncd — homesync daemon
//!
//! Composition root that wires the hub, the event bus and the HTTP adapter
//! together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialise `tracing` logging
//! - Construct the in-process event bus and spawn the hub event loop
//! - Build the axum router, injecting the hub handle and event bus
//! - Bind to a TCP port and serve
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It only wires things together; device rules live in the domain crate.

mod config;

use std::sync::Arc;

use homesync_adapter_http_axum::router;
use homesync_adapter_http_axum::state::AppState;
use homesync_app::event_bus::InProcessEventBus;
use homesync_app::hub;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    // Event bus
    let event_bus = Arc::new(InProcessEventBus::new(config.hub.event_capacity));

    // Hub
    let (hub, hub_task) = hub::spawn(config.hub_settings(), Arc::clone(&event_bus));

    // HTTP
    let state = AppState::new(hub, event_bus);
    let app = router::build(state, &config.server.static_dir);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(
        addr = %bind_addr,
        static_dir = %config.server.static_dir,
        brew_delay_ms = config.devices.brew_delay_ms,
        "homesyncd listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Upgraded WebSocket sessions may still hold hub handles.
    hub_task.abort();
    tracing::info!("homesyncd stopped");

    Ok(())
}

/// Resolve on Ctrl-C, or on SIGTERM where available.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(%err, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(%err, "failed to listen for SIGTERM");
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

    tracing::info!("shutdown signal received");
}
