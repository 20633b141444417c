//! # Engine Errors
//!
//! Two families of errors exist. `ConfigError` is raised while turning raw
//! configuration values into run policies, always before the first tick.
//! `EngineError` is raised by a running engine and carries the tick at which
//! the failure happened where that is meaningful.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Opaque error type returned by producer and sink capabilities.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Rejected configuration. Nothing has been produced or delivered yet.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A setting without default was not supplied.
    #[error("Missing required setting: {0}")]
    MissingValue(&'static str),

    /// The rate is zero, negative or not a number.
    #[error("rate_hz must be a positive number, got {0}")]
    InvalidRate(f64),

    /// The recurrence mode is neither `fixed` nor `infinite`.
    #[error("recurrence.mode must be one of: fixed|infinite (got {0:?})")]
    UnknownRecurrenceMode(String),

    /// Fixed recurrence without a positive count.
    #[error("recurrence.count must be a positive integer when recurrence.mode is fixed")]
    MissingCount,

    /// The print mode is not one of the four known modes.
    #[error("print_mode must be one of: none|first|nth|all (got {0:?})")]
    UnknownPrintMode(String),

    /// No scenario is registered under this name.
    #[error("Unknown scenario: {0}")]
    UnknownScenario(String),

    /// A scenario asset exists but could not be read or parsed.
    #[error("Failed to load scenario asset {path}: {source}")]
    Asset {
        /// The asset file.
        path: PathBuf,
        /// The underlying I/O or JSON error.
        #[source]
        source: BoxError,
    },
}

/// Failure of a running engine. Teardown has already happened when the caller
/// receives one of these.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The producer failed to build the payload for `tick`.
    #[error("Producer failed on tick {tick}: {source}")]
    Producer {
        /// 1-based tick index.
        tick: u64,
        /// Error returned by the producer.
        #[source]
        source: BoxError,
    },

    /// The sink rejected or failed to deliver the payload of `tick`.
    #[error("Sink failed on tick {tick}: {source}")]
    Sink {
        /// 1-based tick index.
        tick: u64,
        /// Error returned by the sink.
        #[source]
        source: BoxError,
    },

    /// The payload journal could not be created, written or flushed.
    #[error("Payload journal {path} failed: {source}")]
    Journal {
        /// Journal destination.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Echoing the payload of `tick` to the console failed.
    #[error("Console echo failed on tick {tick}: {source}")]
    Console {
        /// 1-based tick index.
        tick: u64,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}
