//! Pass-through query to an external time-series store.

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};

use crate::backends::BackendError;

/// One aggregated point of a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Datapoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// Invocation sums and latency averages over a time range.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricSeries {
    pub invocations: Vec<Datapoint>,
    pub latency: Vec<Datapoint>,
}

/// Source of historical request metrics.
#[async_trait]
pub trait MetricsSource: Send + Sync {
    async fn query(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<MetricSeries, BackendError>;
}

/// Fixed series, filtered by the queried range.
#[derive(Debug, Clone, Default)]
pub struct StaticMetrics {
    series: MetricSeries,
}

impl StaticMetrics {
    pub fn new(series: MetricSeries) -> Self {
        Self { series }
    }
}

#[async_trait]
impl MetricsSource for StaticMetrics {
    async fn query(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<MetricSeries, BackendError> {
        let in_range = |points: &[Datapoint]| {
            points
                .iter()
                .filter(|p| p.timestamp >= start && p.timestamp <= end)
                .cloned()
                .collect()
        };
        Ok(MetricSeries {
            invocations: in_range(&self.series.invocations),
            latency: in_range(&self.series.latency),
        })
    }
}

/// Response of `GET /metrics/summary`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSummary {
    pub invocations: Vec<Datapoint>,
    pub latency: Vec<Datapoint>,
    pub total_invocations: f64,
    pub avg_duration: f64,
    pub chart_data: Vec<Datapoint>,
}

/// Range covered by the dashboard.
pub fn summary_window(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    (now - ChronoDuration::days(1), now)
}

pub fn summarize(mut series: MetricSeries) -> MetricsSummary {
    series.invocations.sort_by_key(|p| p.timestamp);
    series.latency.sort_by_key(|p| p.timestamp);

    let total_invocations = series.invocations.iter().map(|p| p.value).sum();
    let avg_duration = if series.latency.is_empty() {
        0.0
    } else {
        series.latency.iter().map(|p| p.value).sum::<f64>() / series.latency.len() as f64
    };

    MetricsSummary {
        chart_data: series.latency.clone(),
        invocations: series.invocations,
        latency: series.latency,
        total_invocations,
        avg_duration,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn point(hour: u32, value: f64) -> Datapoint {
        Datapoint {
            timestamp: Utc.with_ymd_and_hms(2026, 1, 1, hour, 0, 0).unwrap(),
            value,
        }
    }

    #[test]
    fn test_summary_sorts_and_aggregates() {
        let summary = summarize(MetricSeries {
            invocations: vec![point(3, 5.0), point(1, 10.0)],
            latency: vec![point(2, 30.0), point(1, 10.0)],
        });

        assert_eq!(summary.total_invocations, 15.0);
        assert_eq!(summary.avg_duration, 20.0);
        assert_eq!(summary.invocations[0], point(1, 10.0));
        assert_eq!(summary.chart_data, vec![point(1, 10.0), point(2, 30.0)]);
    }

    #[test]
    fn test_empty_latency_averages_to_zero() {
        let summary = summarize(MetricSeries::default());
        assert_eq!(summary.avg_duration, 0.0);
        assert_eq!(summary.total_invocations, 0.0);
    }

    #[tokio::test]
    async fn test_static_metrics_filters_range() {
        let source = StaticMetrics::new(MetricSeries {
            invocations: vec![point(1, 1.0), point(5, 2.0)],
            latency: vec![],
        });
        let start = Utc.with_ymd_and_hms(2026, 1, 1, 4, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 1, 1, 6, 0, 0).unwrap();

        let series = source.query(start, end).await.unwrap();
        assert_eq!(series.invocations, vec![point(5, 2.0)]);
    }
}
