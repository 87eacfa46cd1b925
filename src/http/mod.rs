//! HTTP surface of the counter service.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → handlers.rs (decode body, call counter service / collaborators)
//!     → error.rs (single error → status code boundary)
//!     → JSON response
//! ```

pub mod error;
pub mod handlers;
pub mod server;

pub use error::{decode_visitor_request, ApiError, MalformedInput};
pub use server::{AppState, HttpServer};
