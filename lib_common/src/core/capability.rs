//! # Engine Capabilities
//!
//! The two seams through which the engine reaches the outside world. The
//! engine treats both as opaque: it never inspects a payload and never retries
//! a delivery.

use std::future::Future;

use super::error::BoxError;

/// Source of per-tick payload content.
///
/// Called exactly once per tick, with no memoization on the engine side. Any
/// sequencing (counters, round-robin positions, random picks, timestamps) is
/// private state of the producer instance, whose lifetime is one run.
pub trait PayloadProducer {
    /// Builds the next ready-to-publish serialized payload.
    fn next_payload(&mut self) -> Result<String, BoxError>;
}

impl<P: PayloadProducer + ?Sized> PayloadProducer for Box<P> {
    fn next_payload(&mut self) -> Result<String, BoxError> {
        (**self).next_payload()
    }
}

impl<P: PayloadProducer + ?Sized> PayloadProducer for &mut P {
    fn next_payload(&mut self) -> Result<String, BoxError> {
        (**self).next_payload()
    }
}

/// Producer backed by a closure. See [`from_fn`].
pub struct FromFn<F>(F);

/// Wraps a closure as a [`PayloadProducer`].
///
/// ```rust
/// use lib_common::core::{from_fn, PayloadProducer};
///
/// let mut seq = 0;
/// let mut producer = from_fn(move || {
///     seq += 1;
///     Ok(format!("[{seq}]"))
/// });
/// assert_eq!(producer.next_payload().unwrap(), "[1]");
/// ```
pub fn from_fn<F>(f: F) -> FromFn<F>
where
    F: FnMut() -> Result<String, BoxError>,
{
    FromFn(f)
}

impl<F> PayloadProducer for FromFn<F>
where
    F: FnMut() -> Result<String, BoxError>,
{
    fn next_payload(&mut self) -> Result<String, BoxError> {
        (self.0)()
    }
}

/// Delivery endpoint for produced payloads.
///
/// The returned future resolves once the payload was handed off according to
/// the sink's own contract (for example, acknowledged by a broker). The engine
/// awaits it before doing anything else for the tick, so asynchronous
/// transports still look synchronous from the loop's point of view.
pub trait PublishSink {
    /// Delivers one payload or fails.
    fn publish(&mut self, payload: &str) -> impl Future<Output = Result<(), BoxError>> + Send;
}

impl<S: PublishSink> PublishSink for &mut S {
    fn publish(&mut self, payload: &str) -> impl Future<Output = Result<(), BoxError>> + Send {
        (**self).publish(payload)
    }
}

/// Sink that accepts and drops every payload. Used for dry runs.
#[derive(Debug, Default, Clone)]
pub struct DiscardSink {
    discarded: u64,
}

impl DiscardSink {
    /// A fresh sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Payloads accepted so far.
    pub fn discarded(&self) -> u64 {
        self.discarded
    }
}

impl PublishSink for DiscardSink {
    async fn publish(&mut self, payload: &str) -> Result<(), BoxError> {
        self.discarded += 1;
        log::trace!("Discarded payload of {} bytes", payload.len());
        Ok(())
    }
}
