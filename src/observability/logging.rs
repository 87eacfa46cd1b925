//! Structured logging.
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - `RUST_LOG` wins over the configured level

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. `default_directive` is used when `RUST_LOG`
/// is unset, e.g. `"visitor_slo=info,tower_http=info"`.
pub fn init_logging(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_directive.into());

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Filter directive for this crate and the HTTP middleware at `level`.
pub fn directive_for(level: &str) -> String {
    format!("visitor_slo={level},counter_service={level},reliability_agent={level},tower_http={level}")
}
