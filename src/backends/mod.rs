//! External collaborators of the counter service.
//!
//! # Design Decisions
//! - One capability set per deployment: counter store, object listing and
//!   metrics source are injected together at startup
//! - Deployment variants differ only by the injected implementations
//! - Collaborators live for the whole process

pub mod listing;
pub mod timeseries;

use std::sync::Arc;
use thiserror::Error;

use crate::counter::CounterStore;

pub use listing::{gallery_from_keys, Gallery, ObjectListing, StaticListing};
pub use timeseries::{
    summarize, summary_window, Datapoint, MetricSeries, MetricsSource, MetricsSummary, StaticMetrics,
};

/// Failure of a non-counter collaborator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BackendError {
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

/// Capability set handed to the HTTP layer.
#[derive(Clone)]
pub struct Backends {
    pub store: Arc<dyn CounterStore>,
    pub listing: Arc<dyn ObjectListing>,
    pub metrics: Arc<dyn MetricsSource>,
}

impl Backends {
    /// Counter store only; listing is empty and metrics report no data.
    pub fn with_store(store: Arc<dyn CounterStore>) -> Self {
        Self {
            store,
            listing: Arc::new(StaticListing::default()),
            metrics: Arc::new(StaticMetrics::default()),
        }
    }

    pub fn listing(mut self, listing: Arc<dyn ObjectListing>) -> Self {
        self.listing = listing;
        self
    }

    pub fn metrics(mut self, metrics: Arc<dyn MetricsSource>) -> Self {
        self.metrics = metrics;
        self
    }
}
