//! Counter subsystem.
//!
//! # Data Flow
//! ```text
//! Increment(action)
//!     → service.rs (select field, single atomic add)
//!     → store.rs (add-or-initialize at the store)
//!     → service.rs (full read-back)
//!     → CounterState { views, downloads }
//! ```
//!
//! # Design Decisions
//! - The store is the synchronization point; no in-process locks
//! - Views and downloads are independent fields and never contend
//! - An applied add is never re-issued, even when the read-back fails

pub mod service;
pub mod store;
pub mod types;

pub use service::CounterService;
pub use store::{CounterStore, InMemoryStore};
pub use types::{Action, CounterError, CounterState, StoreError, StoredItem, VisitorRequest};
