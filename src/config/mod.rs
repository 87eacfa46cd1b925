//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → environment overrides (TARGET_URL, INTERVAL, ...)
//!     → validation.rs (semantic checks)
//!     → ServiceConfig / AgentConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_config_with, ConfigError};
pub use schema::{
    AgentConfig, GalleryConfig, LimitsConfig, ListenerConfig, ObservabilityConfig, ServiceConfig,
    StoreConfig, TimeoutConfig, WindowMode, MAX_WINDOW_SIZE,
};
pub use validation::{Validate, ValidationError};
