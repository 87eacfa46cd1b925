//! Reliability agent subsystem.
//!
//! # Data Flow
//! ```text
//! runner.rs loop:
//!     SEND     → sampler.rs picks view/download, client.rs posts /visitor
//!     RECORD   → window.rs counts the attempt and its outcome
//!     EVALUATE → every N attempts, window.rs grades the error rate
//!     SLEEP    → fixed interval, or exit on shutdown
//! ```
//!
//! # Design Decisions
//! - One outstanding request at a time; RECORD ordering is trivially consistent
//! - Every failure is absorbed and counted; the loop never exits on a bad response
//! - State is in memory only and lost on restart

pub mod client;
pub mod runner;
pub mod sampler;
pub mod window;

pub use client::{CounterClient, ProbeError};
pub use runner::ReliabilityAgent;
pub use sampler::ActionSampler;
pub use window::{FailureKind, Outcome, SampleWindow, SloReport, Verdict};
