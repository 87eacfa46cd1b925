//! Configuration loading from disk and environment.

use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

use crate::config::schema::{AgentConfig, ServiceConfig, WindowMode};
use crate::config::validation::{Validate, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value '{value}' for environment variable {name}")]
    Env { name: &'static str, value: String },

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

/// Configurations that accept environment overrides on top of the file.
pub trait EnvOverrides {
    fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>;
}

/// Load a configuration: TOML file (or defaults when no path is given),
/// then environment overrides, then validation.
pub fn load_config<T>(path: Option<&Path>) -> Result<T, ConfigError>
where
    T: DeserializeOwned + Default + EnvOverrides + Validate,
{
    load_config_with(path, |name| std::env::var(name).ok())
}

/// Same as [`load_config`] with an explicit environment lookup.
pub fn load_config_with<T, F>(path: Option<&Path>, lookup: F) -> Result<T, ConfigError>
where
    T: DeserializeOwned + Default + EnvOverrides + Validate,
    F: Fn(&str) -> Option<String>,
{
    let mut config: T = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => T::default(),
    };

    config.apply_env(lookup)?;
    config.validate().map_err(ConfigError::Validation)?;

    Ok(config)
}

fn parsed<T, F>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Env { name, value }),
        None => Ok(None),
    }
}

/// Seconds as a float (e.g. `INTERVAL=0.5`) converted to milliseconds.
fn seconds_as_millis<F>(lookup: &F, name: &'static str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match parsed::<f64, F>(lookup, name)? {
        Some(secs) if secs.is_finite() && secs >= 0.0 => Ok(Some((secs * 1000.0).round() as u64)),
        Some(secs) => Err(ConfigError::Env {
            name,
            value: secs.to_string(),
        }),
        None => Ok(None),
    }
}

impl EnvOverrides for ServiceConfig {
    fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup("BIND_ADDRESS") {
            self.listener.bind_address = addr;
        }
        // TABLE_NAME is the older name for the same setting.
        if let Some(key) = lookup("COUNTER_KEY").or_else(|| lookup("TABLE_NAME")) {
            self.store.counter_key = key;
        }
        if let Some(path) = lookup("COUNTER_SNAPSHOT_PATH") {
            self.store.snapshot_path = Some(path);
        }
        if let Some(bucket) = lookup("GALLERY_BUCKET_NAME") {
            self.gallery.bucket = bucket;
        }
        if let Some(base_url) = lookup("GALLERY_BASE_URL") {
            self.gallery.base_url = base_url;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.observability.log_level = level;
        }
        Ok(())
    }
}

impl EnvOverrides for AgentConfig {
    fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("TARGET_URL") {
            self.target_url = url;
        }
        if let Some(ms) = seconds_as_millis(&lookup, "INTERVAL")? {
            self.interval_ms = ms;
        }
        if let Some(ms) = seconds_as_millis(&lookup, "REQUEST_TIMEOUT")? {
            self.request_timeout_ms = ms;
        }
        if let Some(every) = parsed::<u64, F>(&lookup, "EVALUATION_EVERY")? {
            self.evaluation_every = every;
        }
        if let Some(threshold) = parsed::<f64, F>(&lookup, "SLO_ERROR_THRESHOLD")? {
            self.slo_error_threshold = threshold;
        }
        if let Some(p) = parsed::<f64, F>(&lookup, "DOWNLOAD_PROBABILITY")? {
            self.download_probability = p;
        }
        if let Some(size) = parsed::<usize, F>(&lookup, "SLO_WINDOW_SIZE")? {
            self.window = match size {
                0 => WindowMode::Cumulative,
                size => WindowMode::Sliding { size },
            };
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.observability.log_level = level;
        }
        Ok(())
    }
}
