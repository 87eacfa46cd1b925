//! The agent control loop: SEND → RECORD → EVALUATE → SLEEP.

use rand::rngs::StdRng;
use rand::Rng;
use std::time::{Duration, Instant};
use tokio::sync::broadcast;
use tokio::time::sleep;

use crate::agent::client::CounterClient;
use crate::agent::sampler::ActionSampler;
use crate::agent::window::{Outcome, SampleWindow, SloReport};
use crate::config::AgentConfig;
use crate::observability::metrics;

/// Sends synthetic traffic, one request at a time, and grades it.
pub struct ReliabilityAgent<R = StdRng> {
    client: CounterClient,
    sampler: ActionSampler<R>,
    window: SampleWindow,
    evaluation_every: u64,
    threshold: f64,
    interval: Duration,
}

impl ReliabilityAgent<StdRng> {
    pub fn from_config(config: &AgentConfig) -> Result<Self, reqwest::Error> {
        let client = CounterClient::new(&config.target_url, config.request_timeout())?;
        let sampler = ActionSampler::from_entropy(config.download_probability);
        Ok(Self::new(client, sampler, config))
    }
}

impl<R: Rng> ReliabilityAgent<R> {
    pub fn new(client: CounterClient, sampler: ActionSampler<R>, config: &AgentConfig) -> Self {
        Self {
            client,
            sampler,
            window: SampleWindow::new(config.window),
            evaluation_every: config.evaluation_every,
            threshold: config.slo_error_threshold,
            interval: config.interval(),
        }
    }

    pub fn window(&self) -> &SampleWindow {
        &self.window
    }

    /// SEND: issue one synthetic request and classify it.
    async fn send(&mut self) -> Outcome {
        let action = self.sampler.next_action();
        let start = Instant::now();

        match self.client.increment(action).await {
            Ok(state) => {
                let duration = start.elapsed();
                tracing::debug!(
                    action = %action,
                    duration_secs = duration.as_secs_f64(),
                    views = state.map(|s| s.views),
                    downloads = state.map(|s| s.downloads),
                    "Success"
                );
                Outcome::Success(duration)
            }
            Err(e) => {
                let kind = e.kind();
                tracing::error!(action = %action, kind = kind.as_str(), error = %e, "Request failed");
                metrics::record_agent_failure(kind.as_str());
                Outcome::Failure(kind)
            }
        }
    }

    /// One SEND → RECORD → EVALUATE pass. Returns the report when the
    /// evaluation cadence was reached.
    pub async fn cycle(&mut self) -> Option<SloReport> {
        let outcome = self.send().await;

        self.window.record(outcome);
        metrics::record_attempt();

        if !self.window.is_due(self.evaluation_every) {
            return None;
        }

        let report = self.window.evaluate(self.threshold);
        tracing::info!(
            verdict = %report.verdict,
            error_rate_pct = report.error_rate_pct(),
            avg_latency_secs = report.avg_latency_secs(),
            attempts = report.attempts,
            window_total = report.total,
            window_failed = report.failed,
            "{report}"
        );
        metrics::record_slo_report(&report);
        Some(report)
    }

    /// Cycle until `shutdown` fires. At most one request is in flight.
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            target_url = %self.client.base_url(),
            interval_ms = self.interval.as_millis() as u64,
            evaluation_every = self.evaluation_every,
            threshold = self.threshold,
            "Starting reliability agent"
        );

        loop {
            self.cycle().await;

            tokio::select! {
                _ = sleep(self.interval) => {}
                _ = shutdown.recv() => {
                    tracing::info!(attempts = self.window.attempts(), "Reliability agent stopping");
                    break;
                }
            }
        }
    }
}
