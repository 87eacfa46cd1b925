//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, probabilities in [0, 1])
//! - Check addresses and URLs parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: config → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::{AgentConfig, ObservabilityConfig, ServiceConfig, WindowMode, MAX_WINDOW_SIZE};

/// A single semantic problem with a loaded configuration.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Configurations that can be checked before use.
pub trait Validate {
    fn validate(&self) -> Result<(), Vec<ValidationError>>;
}

impl Validate for ServiceConfig {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.listener.bind_address.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::new(
                "listener.bind_address",
                format!("'{}' is not a socket address", self.listener.bind_address),
            ));
        }
        if self.store.counter_key.trim().is_empty() {
            errors.push(ValidationError::new("store.counter_key", "must not be empty"));
        }
        if self.timeouts.request_secs == 0 {
            errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
        }
        if self.limits.max_body_size == 0 {
            errors.push(ValidationError::new("limits.max_body_size", "must be greater than 0"));
        }
        check_observability(&self.observability, &mut errors);

        finish(errors)
    }
}

impl Validate for AgentConfig {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        match Url::parse(&self.target_url) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            Ok(url) => errors.push(ValidationError::new(
                "target_url",
                format!("unsupported scheme '{}'", url.scheme()),
            )),
            Err(e) => errors.push(ValidationError::new("target_url", e.to_string())),
        }
        if self.interval_ms == 0 {
            errors.push(ValidationError::new("interval_ms", "must be greater than 0"));
        }
        if self.request_timeout_ms == 0 {
            errors.push(ValidationError::new("request_timeout_ms", "must be greater than 0"));
        }
        if self.evaluation_every == 0 {
            errors.push(ValidationError::new("evaluation_every", "must be greater than 0"));
        }
        if !(0.0..=1.0).contains(&self.slo_error_threshold) {
            errors.push(ValidationError::new("slo_error_threshold", "must be within [0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.download_probability) {
            errors.push(ValidationError::new("download_probability", "must be within [0, 1]"));
        }
        match self.window {
            WindowMode::Sliding { size: 0 } => {
                errors.push(ValidationError::new("window.size", "sliding window needs at least one slot"));
            }
            WindowMode::Sliding { size } if size > MAX_WINDOW_SIZE => {
                errors.push(ValidationError::new(
                    "window.size",
                    format!("must be at most {MAX_WINDOW_SIZE}"),
                ));
            }
            _ => {}
        }
        check_observability(&self.observability, &mut errors);

        finish(errors)
    }
}

fn check_observability(config: &ObservabilityConfig, errors: &mut Vec<ValidationError>) {
    if config.metrics_enabled && config.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.metrics_address),
        ));
    }
}

fn finish(errors: Vec<ValidationError>) -> Result<(), Vec<ValidationError>> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
