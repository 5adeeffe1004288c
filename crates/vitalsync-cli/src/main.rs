//! # VitalSync CLI
//!
//! Terminal client for the VitalSync realtime recommendation service.
//!
//! ## Usage
//!
//! ```bash
//! # Run with default settings
//! vitalsync
//!
//! # Run against another server
//! VITALSYNC_URL=ws://health.example.com/ws vitalsync
//! ```

mod config;
mod output;

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use metrics_exporter_prometheus::PrometheusBuilder;
use tokio::sync::broadcast;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vitalsync_client::Client;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vitalsync=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = config::Config::load()?;

    tracing::info!("Connecting to {}", config.connection.url);

    // Initialize metrics
    if config.metrics.enabled {
        if let Err(e) = start_metrics_exporter(config.metrics.port) {
            tracing::error!("Failed to start metrics exporter: {}", e);
        }
    }
    vitalsync_client::metrics::init_metrics();

    // Build the client and wire up output
    let client = Client::new(config.client_config());
    output::register_handlers(&client);

    let mut status_rx = client.subscribe_status();
    tokio::spawn(async move {
        loop {
            match status_rx.recv().await {
                Ok(status) => output::print_status(&status),
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    client.connect()?;

    // Run until interrupted
    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");
    client.disconnect();

    // Give the supervisor a moment to close the session cleanly.
    let mut status = client.watch_status();
    let _ = tokio::time::timeout(Duration::from_secs(2), async {
        while client.is_running() {
            if status.changed().await.is_err() {
                break;
            }
        }
    })
    .await;

    Ok(())
}

/// Start the Prometheus metrics exporter.
fn start_metrics_exporter(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let addr: SocketAddr = format!("0.0.0.0:{}", port).parse()?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;

    tracing::info!("Metrics exporter listening on {}", addr);
    Ok(())
}
