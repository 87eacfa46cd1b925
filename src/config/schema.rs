//! Configuration schema definitions.
//!
//! This module defines the configuration structure for both processes: the
//! counter service and the reliability agent. All types derive Serde traits
//! for deserialization from TOML files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the counter service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Counter store settings.
    pub store: StoreConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request limits.
    pub limits: LimitsConfig,

    /// Object listing settings for the gallery endpoint.
    pub gallery: GalleryConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
        }
    }
}

/// Counter store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Well-known key of the single counter aggregate.
    pub counter_key: String,

    /// Optional JSON snapshot file for the in-memory store.
    pub snapshot_path: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            counter_key: "visitor_stats".to_string(),
            snapshot_path: None,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum request body size in bytes.
    pub max_body_size: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_size: 64 * 1024,
        }
    }
}

/// Gallery listing configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GalleryConfig {
    /// Bucket the object keys are listed from.
    pub bucket: String,

    /// Public base URL the object keys are appended to.
    pub base_url: String,

    /// Object keys served by the static listing.
    pub keys: Vec<String>,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            bucket: "gallery".to_string(),
            base_url: "http://127.0.0.1:8000/static".to_string(),
            keys: Vec::new(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Largest accepted sliding window.
pub const MAX_WINDOW_SIZE: usize = 1_000_000;

/// How the agent aggregates outcomes for SLO evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum WindowMode {
    /// Every attempt since process start counts.
    #[default]
    Cumulative,
    /// Only the most recent `size` attempts count.
    Sliding { size: usize },
}

/// Root configuration for the reliability agent.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Base URL of the counter service.
    pub target_url: String,

    /// Pause between cycles in milliseconds.
    pub interval_ms: u64,

    /// Per-request timeout in milliseconds.
    pub request_timeout_ms: u64,

    /// Evaluate the SLO every N attempts.
    pub evaluation_every: u64,

    /// Maximum tolerated error rate (0.001 = 99.9% availability).
    pub slo_error_threshold: f64,

    /// Probability that a synthetic request is a download.
    pub download_probability: f64,

    /// Aggregation window for the error rate.
    pub window: WindowMode,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            target_url: "http://127.0.0.1:8000".to_string(),
            interval_ms: 1000,
            request_timeout_ms: 2000,
            evaluation_every: 10,
            slo_error_threshold: 0.001,
            download_probability: 0.1,
            window: WindowMode::Cumulative,
            observability: ObservabilityConfig {
                metrics_enabled: false,
                metrics_address: "0.0.0.0:9091".to_string(),
                ..ObservabilityConfig::default()
            },
        }
    }
}

impl AgentConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_defaults_match_reference() {
        let config = AgentConfig::default();
        assert_eq!(config.interval(), Duration::from_secs(1));
        assert_eq!(config.request_timeout(), Duration::from_secs(2));
        assert_eq!(config.evaluation_every, 10);
        assert_eq!(config.slo_error_threshold, 0.001);
        assert_eq!(config.window, WindowMode::Cumulative);
        assert!(!config.observability.metrics_enabled);
    }

    #[test]
    fn test_minimal_toml_uses_defaults() {
        let config: ServiceConfig = toml::from_str("[listener]\nbind_address = \"127.0.0.1:9000\"\n").unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:9000");
        assert_eq!(config.store.counter_key, "visitor_stats");
        assert!(config.store.snapshot_path.is_none());
    }

    #[test]
    fn test_sliding_window_from_toml() {
        let config: AgentConfig = toml::from_str("[window]\nmode = \"sliding\"\nsize = 50\n").unwrap();
        assert_eq!(config.window, WindowMode::Sliding { size: 50 });
    }
}
