//! # Core Engine Module
//!
//! This module forms the heart of the scenario publisher. It aggregates every
//! component the central engine needs to drive a bounded or unbounded sequence
//! of ticks at a target frequency.
//!
//! ## Core Components:
//!
//! - **`engine`**: The `CentralEngine` tick loop. Per tick it calls the
//!   producer, awaits the sink, applies the print policy, appends to the journal
//!   and finally paces itself against the rate controller.
//!
//! - **`rate`**: The drift-corrected rate controller. The next deadline is
//!   anchored to `max(now, previous deadline) + period`, so a slow tick never
//!   triggers a burst of catch-up ticks.
//!
//! - **`policy`**: Immutable run policies (`RecurrenceSpec`, `PrintPolicy`,
//!   `LogPolicy`) and their parsing from configuration values.
//!
//! - **`journal`**: The lazily opened, flush-per-write, close-exactly-once
//!   append log for payloads.
//!
//! - **`capability`**: The `PayloadProducer` and `PublishSink` seams through
//!   which scenarios and transports plug into the engine.
//!
//! - **`error`**: Configuration and run-time error types.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

/// Producer and sink capabilities consumed by the engine.
pub mod capability;
/// The rate-controlled tick loop.
pub mod engine;
/// Configuration and run-time errors.
pub mod error;
/// Append-only payload log with a scoped file handle.
pub mod journal;
/// Recurrence, print and log policies.
pub mod policy;
/// Rate specification and drift-corrected pacing.
pub mod rate;

// --- Public API Re-exports ---
pub use capability::{from_fn, DiscardSink, FromFn, PayloadProducer, PublishSink};
pub use engine::{CentralEngine, RunOutcome};
pub use error::{BoxError, ConfigError, EngineError};
pub use journal::PayloadJournal;
pub use policy::{LogPolicy, PrintPolicy, RecurrenceSpec, DEFAULT_LOG_FILE};
pub use rate::{Pacer, RateSpec, MIN_RATE_HZ};
pub use tokio_util::sync::CancellationToken;
