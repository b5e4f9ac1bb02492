//! Aries server binary.
//!
//! Usage:
//!
//! ```text
//! aries [--config <path>] [--port <port>]
//! ```
//!
//! Settings come from the optional TOML file and `ARIES__*` environment
//! variables. `--port` overrides the configured listening port.

use aries::config::AriesConfig;
use aries::http::{AppState, router};
use aries::lookup::{adapters::HttpDownstreamClient, services::LookupAggregator};
use aries::registry::{
    adapters::{HttpLivenessProbe, file::JsonFileServiceStore},
    services::{ServiceRegistry, spawn_heartbeat},
};
use aries::telemetry;
use camino::Utf8PathBuf;
use clap::Parser;
use mockable::DefaultClock;
use std::error::Error;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

type BoxError = Box<dyn Error + Send + Sync>;

/// Command line arguments.
#[derive(Debug, Parser)]
#[command(name = "aries")]
#[command(about = "Aggregates identifier lookups across registered catalog services.")]
struct Cli {
    /// TOML configuration file; missing files are ignored.
    #[arg(long)]
    config: Option<Utf8PathBuf>,
    /// Port to listen on, overriding the configuration.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let cli = Cli::parse();
    let mut config = AriesConfig::load(cli.config.as_deref())?;
    if let Some(port) = cli.port {
        config.set_port(port);
    }
    telemetry::init(&config.logging)?;
    info!(version = env!("CARGO_PKG_VERSION"), "starting Aries");

    let store = JsonFileServiceStore::open(&config.store_path)?;
    if let Some(csv_name) = config.seed_csv.as_deref() {
        store.seed_from_legacy_csv(csv_name).await?;
    }
    let probe = HttpLivenessProbe::new(config.probe.timeout(), config.probe.liveness_suffix.as_str())?;
    let registry = Arc::new(ServiceRegistry::new(
        Arc::new(store),
        Arc::new(probe),
        Arc::new(DefaultClock),
    ));
    let loaded = registry.load().await?;
    info!(services = loaded, store = %config.store_path, "service registry loaded");

    let heartbeat = spawn_heartbeat(Arc::clone(&registry), config.heartbeat.interval());

    let client = HttpDownstreamClient::new(config.lookup.timeout(), config.lookup.path_suffix.as_str())?;
    let aggregator = Arc::new(LookupAggregator::new(
        Arc::clone(&registry),
        Arc::new(client),
        config.lookup.aggregator_settings(),
    ));
    let app = router(AppState::new(registry, aggregator));

    let listener = TcpListener::bind(config.listen_addr).await?;
    info!(addr = %config.listen_addr, "Aries listening");
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    heartbeat.shutdown().await;
    served?;
    info!("Aries stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for Ctrl+C");
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
                warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Ctrl+C received, shutting down"),
        () = terminate => info!("SIGTERM received, shutting down"),
    }
}
