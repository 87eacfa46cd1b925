//! Reliability agent: synthetic traffic and SLO grading for the counter service.

use clap::Parser;
use std::path::PathBuf;

use visitor_slo::agent::{CounterClient, ReliabilityAgent};
use visitor_slo::config::{load_config, AgentConfig};
use visitor_slo::lifecycle::{wait_for_signal, Shutdown};
use visitor_slo::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "reliability-agent")]
#[command(about = "Synthetic traffic generator and SLO evaluator", long_about = None)]
struct Args {
    /// TOML configuration file; environment variables override it.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level when RUST_LOG is unset.
    #[arg(long)]
    log_level: Option<String>,

    /// Probe /health once and exit instead of running the loop.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config: AgentConfig = load_config(args.config.as_deref())?;

    let level = args.log_level.as_deref().unwrap_or(&config.observability.log_level);
    logging::init_logging(&logging::directive_for(level));

    if args.check {
        let client = CounterClient::new(&config.target_url, config.request_timeout())?;
        client.health().await?;
        tracing::info!(target_url = %config.target_url, "Counter service is healthy");
        return Ok(());
    }

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let agent = ReliabilityAgent::from_config(&config)?;

    let shutdown = Shutdown::new();
    let agent_shutdown = shutdown.subscribe();
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        wait_for_signal().await;
        signal_shutdown.trigger();
    });

    agent.run(agent_shutdown).await;
    Ok(())
}
