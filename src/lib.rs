//! Visitor counter service and its reliability agent.
//!
//! The counter service applies atomic increments to a single
//! `{views, downloads}` aggregate; the agent drives synthetic traffic at it
//! and grades the error rate against an SLO threshold.

pub mod agent;
pub mod backends;
pub mod config;
pub mod counter;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::{AgentConfig, ServiceConfig};
pub use counter::{CounterService, CounterState};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
