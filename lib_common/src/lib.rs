//! # lib_common
//!
//! Shared library for the scenario publishing workspace. Each top-level folder
//! is gated behind a cargo feature of the same name so that binaries only pull
//! the dependencies they actually use.
//!
//! - **`core`**: the central engine, its policies, the rate controller and the
//!   payload journal.
//! - **`scenarios`**: synthetic payload producers.
//! - **`connections`**: delivery sinks backed by external services.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

/// The rate-controlled execution loop and everything it owns.
#[cfg(feature = "core")]
pub mod core;

/// Per-scenario payload producers.
#[cfg(feature = "scenarios")]
pub mod scenarios;

/// Publish sinks backed by external services.
#[cfg(feature = "connections")]
pub mod connections;

// Re-export the engine surface so callers can write `lib_common::CentralEngine`.
#[cfg(feature = "core")]
pub use crate::core::{
    BoxError, CentralEngine, ConfigError, EngineError, LogPolicy, PayloadProducer, PrintPolicy,
    PublishSink, RateSpec, RecurrenceSpec, RunOutcome,
};
