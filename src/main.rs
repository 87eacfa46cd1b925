//! Visitor counter service.
//!
//! # Architecture Overview
//!
//! ```text
//!     POST /visitor ──▶ http::server ──▶ counter::service ──▶ CounterStore
//!                                              │                 (atomic add,
//!     ◀── {views, downloads} ◀─────────────────┘                  read-back)
//!
//!     GET /gallery          ──▶ ObjectListing
//!     GET /metrics/summary  ──▶ MetricsSource
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use visitor_slo::backends::{Backends, StaticListing};
use visitor_slo::config::{load_config, ServiceConfig};
use visitor_slo::counter::InMemoryStore;
use visitor_slo::lifecycle::{wait_for_signal, Shutdown};
use visitor_slo::observability::{logging, metrics};
use visitor_slo::HttpServer;

#[derive(Parser)]
#[command(name = "counter-service")]
#[command(about = "Visitor counter HTTP service", long_about = None)]
struct Args {
    /// TOML configuration file; environment variables override it.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level when RUST_LOG is unset.
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config: ServiceConfig = load_config(args.config.as_deref())?;

    let level = args.log_level.as_deref().unwrap_or(&config.observability.log_level);
    logging::init_logging(&logging::directive_for(level));

    tracing::info!("counter-service v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        counter_key = %config.store.counter_key,
        gallery_bucket = %config.gallery.bucket,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let store = match &config.store.snapshot_path {
        Some(path) => InMemoryStore::load_from_file(path)?,
        None => InMemoryStore::new(None),
    };
    let backends = Backends::with_store(Arc::new(store.clone()))
        .listing(Arc::new(StaticListing::new(config.gallery.keys.clone())));

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        wait_for_signal().await;
        signal_shutdown.trigger();
    });

    HttpServer::new(config, backends).run(listener, server_shutdown).await?;

    if let Err(e) = store.save_to_file() {
        tracing::error!(error = %e, "Failed to save counter snapshot");
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
