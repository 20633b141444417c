//! # Central Engine
//!
//! Drives a bounded or unbounded sequence of ticks at a target frequency.
//!
//! ## Tick workflow
//! 1.  **Produce**: exactly one call to the producer.
//! 2.  **Deliver**: exactly one sink delivery, awaited to completion.
//! 3.  **Echo**: at most one console line, decided by the `PrintPolicy` against
//!     the current tick index.
//! 4.  **Journal**: one appended line per tick when logging is enabled. A line
//!     is only written after the sink accepted that tick's payload.
//! 5.  **Pace**: sleep until the pending deadline, then re-anchor it with the
//!     drift-corrected rule from [`Pacer`].
//!
//! Errors from the producer, the sink or journal I/O end the run at once; there
//! is no retry. Whatever the exit path, the journal handle is released exactly
//! once before `run` returns (or, if the caller drops the future, when the
//! journal goes out of scope).

use std::fmt;
use std::io::{self, Write};
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::capability::{PayloadProducer, PublishSink};
use super::error::EngineError;
use super::journal::PayloadJournal;
use super::policy::{LogPolicy, PrintPolicy, RecurrenceSpec};
use super::rate::{Pacer, RateSpec};

/// Summary of a run that ended cleanly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunOutcome {
    /// Ticks that completed all of their effects.
    pub ticks: u64,
    /// Wall-clock time from run start to loop exit.
    pub elapsed: Duration,
    /// True when the loop stopped because the shutdown token fired.
    pub interrupted: bool,
    /// Lines appended to the payload journal.
    pub journaled: u64,
}

impl RunOutcome {
    /// Observed tick rate over the whole run.
    pub fn effective_hz(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.ticks as f64 / secs
        } else {
            0.0
        }
    }
}

/// How the tick loop stopped, before teardown.
enum LoopExit {
    Completed(u64),
    Interrupted(u64),
}

/// The rate-controlled execution loop.
pub struct CentralEngine {
    print: PrintPolicy,
    log: LogPolicy,
    console: Box<dyn Write + Send>,
}

impl fmt::Debug for CentralEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CentralEngine")
            .field("print", &self.print)
            .field("log", &self.log)
            .finish_non_exhaustive()
    }
}

impl CentralEngine {
    /// Engine echoing to stdout.
    pub fn new(print: PrintPolicy, log: LogPolicy) -> Self {
        Self {
            print,
            log,
            console: Box::new(io::stdout()),
        }
    }

    /// Replaces the console the print policy echoes to.
    pub fn with_console(mut self, console: impl Write + Send + 'static) -> Self {
        self.console = Box::new(console);
        self
    }

    /// The print policy for every run of this engine.
    pub fn print_policy(&self) -> PrintPolicy {
        self.print
    }

    /// The log policy for every run of this engine.
    pub fn log_policy(&self) -> &LogPolicy {
        &self.log
    }

    /// Runs the tick loop until the recurrence is exhausted or `shutdown` fires.
    ///
    /// `shutdown` is observed at tick boundaries and interrupts the pacing
    /// sleep; it never cuts a tick short. Both completion and interruption are
    /// `Ok`. Producer, sink and journal failures are returned as-is after the
    /// journal has been closed.
    pub async fn run<P, S>(
        &mut self,
        rate: RateSpec,
        recurrence: RecurrenceSpec,
        producer: &mut P,
        sink: &mut S,
        shutdown: &CancellationToken,
    ) -> Result<RunOutcome, EngineError>
    where
        P: PayloadProducer + ?Sized,
        S: PublishSink,
    {
        let mut journal = self
            .log
            .enabled
            .then(|| PayloadJournal::new(&self.log.destination));

        log::info!(
            "Starting run: {:.3} Hz, recurrence {}, print {}, journal {}",
            rate.hz(),
            recurrence,
            self.print,
            journal
                .as_ref()
                .map_or_else(|| "off".to_string(), |j| j.path().display().to_string())
        );

        let started = Instant::now();
        let exit = self
            .drive(rate, recurrence, producer, sink, shutdown, journal.as_mut(), started)
            .await;
        let elapsed = started.elapsed();

        // Teardown runs on every path; a loop error takes precedence over a
        // close error.
        let (closed, journaled) = match journal.as_mut() {
            Some(j) => (
                j.close().map_err(|source| EngineError::Journal {
                    path: j.path().to_path_buf(),
                    source,
                }),
                j.appended(),
            ),
            None => (Ok(()), 0),
        };

        let exit = match exit {
            Ok(exit) => exit,
            Err(e) => {
                if let Err(close_err) = &closed {
                    log::warn!("Journal teardown after a failed run: {}", close_err);
                }
                log::error!("Run aborted after {:?}: {}", elapsed, e);
                return Err(e);
            }
        };
        closed?;

        let (ticks, interrupted) = match exit {
            LoopExit::Completed(ticks) => (ticks, false),
            LoopExit::Interrupted(ticks) => (ticks, true),
        };
        let outcome = RunOutcome {
            ticks,
            elapsed,
            interrupted,
            journaled,
        };
        if interrupted {
            log::info!("Run interrupted after {} tick(s) in {:?}", ticks, elapsed);
        } else {
            log::info!("Run completed: {} tick(s) in {:?}", ticks, elapsed);
        }
        Ok(outcome)
    }

    #[allow(clippy::too_many_arguments)]
    async fn drive<P, S>(
        &mut self,
        rate: RateSpec,
        recurrence: RecurrenceSpec,
        producer: &mut P,
        sink: &mut S,
        shutdown: &CancellationToken,
        mut journal: Option<&mut PayloadJournal>,
        started: Instant,
    ) -> Result<LoopExit, EngineError>
    where
        P: PayloadProducer + ?Sized,
        S: PublishSink,
    {
        let mut pacer = Pacer::starting_at(rate, started);
        let mut tick: u64 = 0;

        loop {
            if recurrence.is_exhausted(tick) {
                return Ok(LoopExit::Completed(tick));
            }
            if shutdown.is_cancelled() {
                return Ok(LoopExit::Interrupted(tick));
            }

            tick += 1;
            let payload = producer
                .next_payload()
                .map_err(|source| EngineError::Producer { tick, source })?;
            sink.publish(&payload)
                .await
                .map_err(|source| EngineError::Sink { tick, source })?;

            if self.print.should_print(tick) {
                self.echo(&payload)
                    .map_err(|source| EngineError::Console { tick, source })?;
            }
            if let Some(journal) = journal.as_deref_mut() {
                journal.append(&payload).map_err(|source| EngineError::Journal {
                    path: journal.path().to_path_buf(),
                    source,
                })?;
            }
            log::trace!("Tick {} delivered ({} bytes)", tick, payload.len());

            let wait = pacer.advance(Instant::now());
            if !wait.is_zero() {
                tokio::select! {
                    biased;
                    _ = shutdown.cancelled() => {
                        return Ok(if recurrence.is_exhausted(tick) {
                            LoopExit::Completed(tick)
                        } else {
                            LoopExit::Interrupted(tick)
                        });
                    }
                    _ = tokio::time::sleep(wait) => {}
                }
            }
        }
    }

    fn echo(&mut self, payload: &str) -> io::Result<()> {
        writeln!(self.console, "{payload}")?;
        self.console.flush()
    }
}
