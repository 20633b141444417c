//! # Rate Controller
//!
//! Converts a target frequency into a fixed period once per run and paces the
//! tick loop against a single scheduling anchor.
//!
//! ## Drift correction
//! After each tick the controller compares the current time with the pending
//! deadline. If the tick finished early the loop sleeps the difference. The
//! next deadline is then `max(now, deadline) + period`: a tick that overran its
//! slot re-anchors the schedule to "now" instead of queueing a burst of
//! back-to-back ticks to catch up. Sleeps are never negative.

use std::time::Duration;

use tokio::time::Instant;

use super::error::ConfigError;

/// Floor applied to non-positive or non-numeric rates before computing the period.
pub const MIN_RATE_HZ: f64 = 0.001;

/// Target tick frequency of a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateSpec {
    hz: f64,
}

impl RateSpec {
    /// Builds a rate, clamping anything below [`MIN_RATE_HZ`] (including NaN)
    /// up to the floor so that the period is always finite.
    pub fn new(hz: f64) -> Self {
        Self {
            hz: hz.max(MIN_RATE_HZ),
        }
    }

    /// Strict variant used for configuration values: zero, negative and
    /// non-finite rates are rejected instead of clamped.
    pub fn parse_hz(hz: f64) -> Result<Self, ConfigError> {
        if hz.is_finite() && hz > 0.0 {
            Ok(Self::new(hz))
        } else {
            Err(ConfigError::InvalidRate(hz))
        }
    }

    /// The effective frequency after clamping.
    pub fn hz(&self) -> f64 {
        self.hz
    }

    /// Time allotted to one tick.
    pub fn period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.hz)
    }
}

/// Drift-corrected pacing state for one run.
#[derive(Debug, Clone)]
pub struct Pacer {
    period: Duration,
    next_deadline: Instant,
}

impl Pacer {
    /// Anchors the schedule at the current instant.
    pub fn start(rate: RateSpec) -> Self {
        Self::starting_at(rate, Instant::now())
    }

    /// Anchors the schedule at `anchor`.
    pub fn starting_at(rate: RateSpec, anchor: Instant) -> Self {
        Self {
            period: rate.period(),
            next_deadline: anchor,
        }
    }

    /// Returns how long to sleep when a tick finishes at `now`, and moves the
    /// deadline to `max(now, deadline) + period`.
    pub fn advance(&mut self, now: Instant) -> Duration {
        let wait = self.next_deadline.saturating_duration_since(now);
        self.next_deadline = now.max(self.next_deadline) + self.period;
        wait
    }

    /// The deadline the next call to [`Pacer::advance`] is measured against.
    pub fn next_deadline(&self) -> Instant {
        self.next_deadline
    }

    /// The fixed period of this run.
    pub fn period(&self) -> Duration {
        self.period
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_is_inverse_of_rate() {
        assert_eq!(RateSpec::new(10.0).period(), Duration::from_millis(100));
        assert_eq!(RateSpec::new(0.5).period(), Duration::from_secs(2));
    }

    #[test]
    fn non_positive_rates_are_clamped_to_the_floor() {
        for hz in [0.0, -3.0, f64::NAN] {
            let rate = RateSpec::new(hz);
            assert_eq!(rate.hz(), MIN_RATE_HZ);
            assert_eq!(rate.period(), Duration::from_secs(1000));
        }
    }

    #[test]
    fn parse_hz_rejects_what_new_would_clamp() {
        assert!(RateSpec::parse_hz(48.0).is_ok());
        assert!(matches!(RateSpec::parse_hz(0.0), Err(ConfigError::InvalidRate(_))));
        assert!(matches!(RateSpec::parse_hz(-1.0), Err(ConfigError::InvalidRate(_))));
        assert!(RateSpec::parse_hz(f64::INFINITY).is_err());
        assert!(RateSpec::parse_hz(f64::NAN).is_err());
    }

    #[test]
    fn early_tick_sleeps_until_deadline() {
        let t0 = Instant::now();
        let mut pacer = Pacer::starting_at(RateSpec::new(10.0), t0);

        // First tick finishes right at the anchor: nothing to wait for.
        assert_eq!(pacer.advance(t0), Duration::ZERO);
        assert_eq!(pacer.next_deadline(), t0 + Duration::from_millis(100));

        // Second tick finishes 30ms in: wait out the remaining 70ms.
        let wait = pacer.advance(t0 + Duration::from_millis(30));
        assert_eq!(wait, Duration::from_millis(70));
        assert_eq!(pacer.next_deadline(), t0 + Duration::from_millis(200));
    }

    #[test]
    fn slow_tick_re_anchors_instead_of_bursting() {
        let t0 = Instant::now();
        let mut pacer = Pacer::starting_at(RateSpec::new(10.0), t0);
        pacer.advance(t0);

        // A tick overruns by 350ms: no sleep, and the next slot is one period
        // after "now", not the stale deadline plus one period.
        let late = t0 + Duration::from_millis(450);
        assert_eq!(pacer.advance(late), Duration::ZERO);
        assert_eq!(pacer.next_deadline(), late + Duration::from_millis(100));

        // The following tick is paced normally again.
        let wait = pacer.advance(late + Duration::from_millis(10));
        assert_eq!(wait, Duration::from_millis(90));
    }
}
