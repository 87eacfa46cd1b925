//! Metrics collection and exposition.
//!
//! # Metrics
//! - `visitor_requests_total` (counter): HTTP requests by method, path, status
//! - `visitor_request_duration_seconds` (histogram): handler latency
//! - `visitor_increments_total` (counter): applied increments by action
//! - `agent_attempts_total` (counter): synthetic requests sent
//! - `agent_failures_total` (counter): failed synthetic requests by kind
//! - `agent_error_rate`, `agent_avg_latency_seconds`, `agent_slo_breach` (gauges)
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use metrics::{counter, gauge, histogram, Label};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

use crate::agent::window::{SloReport, Verdict};
use crate::counter::Action;

/// Install the Prometheus exporter with an HTTP scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, path: &str, status: u16, start_time: Instant) {
    let route = vec![
        Label::new("method", method.to_string()),
        Label::new("path", path.to_string()),
    ];
    let mut labels = route.clone();
    labels.push(Label::new("status", status.to_string()));

    counter!("visitor_requests_total", labels).increment(1);
    histogram!("visitor_request_duration_seconds", route).record(start_time.elapsed().as_secs_f64());
}

pub fn record_increment(action: Action) {
    counter!("visitor_increments_total", "action" => action.as_str()).increment(1);
}

pub fn record_attempt() {
    counter!("agent_attempts_total").increment(1);
}

pub fn record_agent_failure(kind: &'static str) {
    counter!("agent_failures_total", "kind" => kind).increment(1);
}

pub fn record_slo_report(report: &SloReport) {
    gauge!("agent_error_rate").set(report.error_rate);
    gauge!("agent_avg_latency_seconds").set(report.avg_latency_secs());
    gauge!("agent_slo_breach").set(if report.verdict == Verdict::Breach { 1.0 } else { 0.0 });
}
