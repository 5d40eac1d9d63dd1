//! Application lifecycle: initialization, server task, and shutdown.

use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info};

use crate::config::Config;
use crate::server;
use crate::state::AppState;

/// Run the full application lifecycle after config has been parsed.
pub async fn run(config: Config) -> anyhow::Result<()> {
    init_tracing(&config);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        port = config.port,
        provider = %config.provider_url,
        "ipgeo starting"
    );

    let state = Arc::new(AppState::new(config).context("failed to create geolocation client")?);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let mut server_handle = {
        let state = Arc::clone(&state);
        tokio::spawn(async move { server::run(state, shutdown_rx).await })
    };

    tokio::select! {
        result = &mut server_handle => {
            // Server exited on its own, e.g. the port was taken.
            return result.context("server task panicked")?;
        }
        name = shutdown_signal() => {
            info!(signal = name, "shutdown signal received");
        }
    }

    let _ = shutdown_tx.send(true);

    if let Err(e) = server_handle.await.context("server task panicked")? {
        error!(error = %e, "server error during shutdown");
    }

    info!("ipgeo stopped");
    Ok(())
}

fn init_tracing(config: &Config) {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    // Exactly one of the two formatters is present.
    let json = config.log_json.then(|| fmt::layer().json());
    let text = (!config.log_json).then(|| fmt::layer());

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(text)
        .init();
}

/// Resolves with the name of the first termination signal received.
async fn shutdown_signal() -> &'static str {
    let interrupt = async {
        match signal::ctrl_c().await {
            Ok(()) => "SIGINT",
            Err(e) => {
                error!(error = %e, "cannot listen for SIGINT");
                std::future::pending().await
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                "SIGTERM"
            }
            Err(e) => {
                error!(error = %e, "cannot listen for SIGTERM");
                std::future::pending().await
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<&'static str>();

    tokio::select! {
        name = interrupt => name,
        name = terminate => name,
    }
}
