//! # Scenarios Module
//!
//! Each scenario is a payload producer plus the default pacing it was designed
//! for. Scenarios are selected by name from configuration and built once per
//! run; every producer owns its sequencing state privately, so two runs never
//! share counters.
//!
//! ## Contained Modules:
//! - **`assets`**: loading of the optional JSON word lists scenarios draw from.
//! - **`roster`** (`scenario1`): a small user/message body for quick checks.
//! - **`detections`** (`scenario2`): a `FrameDetections` body with a fixed
//!   track/class sequence and random confidence and bounding boxes.
//!
//! Every payload is the JSON serialization of a one-element array wrapping the
//! scenario body.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Serialize;

use crate::core::{BoxError, ConfigError, PayloadProducer, RateSpec, RecurrenceSpec};

/// JSON word-list loading shared by scenarios.
pub mod assets;
/// `scenario2`: synthetic object detections.
pub mod detections;
/// `scenario1`: simple user/message bodies.
pub mod roster;

pub use detections::{DetectionsProducer, FrameDetections};
pub use roster::{RosterBody, RosterProducer};

/// The registered scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioKind {
    /// `scenario1`.
    Roster,
    /// `scenario2`.
    Detections,
}

impl ScenarioKind {
    /// Every registered scenario.
    pub const ALL: [ScenarioKind; 2] = [ScenarioKind::Roster, ScenarioKind::Detections];

    /// Canonical configuration name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Roster => "scenario1",
            Self::Detections => "scenario2",
        }
    }

    /// One-line human description.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Roster => {
                "Simple body {name, user_name, sent_messages}: random name, sequential user name, per-message counter."
            }
            Self::Detections => {
                "FrameDetections: 10x track 1/Fuego, 1x track 2/Humo, 1x track 3/Chispas; random confidence and bbox."
            }
        }
    }

    /// Rate the scenario was designed for.
    pub fn default_rate(&self) -> RateSpec {
        match self {
            Self::Roster => RateSpec::new(roster::RATE_HZ),
            Self::Detections => RateSpec::new(detections::RATE_HZ),
        }
    }

    /// Recurrence the scenario was designed for.
    pub fn default_recurrence(&self) -> RecurrenceSpec {
        match self {
            Self::Roster => RecurrenceSpec::Fixed(roster::COUNT),
            Self::Detections => RecurrenceSpec::Fixed(detections::COUNT),
        }
    }

    /// Builds a fresh producer, loading assets from `assets_dir`.
    pub fn build(&self, assets_dir: &Path) -> Result<ScenarioSetup, ConfigError> {
        let producer: Box<dyn PayloadProducer + Send> = match self {
            Self::Roster => Box::new(RosterProducer::from_assets(assets_dir)?),
            Self::Detections => Box::new(DetectionsProducer::new()),
        };
        log::debug!("Built scenario '{}' from {}", self.name(), assets_dir.display());
        Ok(ScenarioSetup {
            kind: *self,
            rate: self.default_rate(),
            recurrence: self.default_recurrence(),
            producer,
        })
    }
}

impl FromStr for ScenarioKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scenario1" | "roster" => Ok(Self::Roster),
            "scenario2" | "detections" => Ok(Self::Detections),
            _ => Err(ConfigError::UnknownScenario(s.to_string())),
        }
    }
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A scenario ready to be handed to the engine.
pub struct ScenarioSetup {
    /// Which scenario this is.
    pub kind: ScenarioKind,
    /// Designed rate; callers may override it.
    pub rate: RateSpec,
    /// Designed recurrence; callers may override it.
    pub recurrence: RecurrenceSpec,
    /// The per-run producer.
    pub producer: Box<dyn PayloadProducer + Send>,
}

impl fmt::Debug for ScenarioSetup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScenarioSetup")
            .field("kind", &self.kind)
            .field("rate", &self.rate)
            .field("recurrence", &self.recurrence)
            .finish_non_exhaustive()
    }
}

/// Serializes `body` as the one-element JSON array scenarios publish.
pub fn wrap_payload<T: Serialize>(body: &T) -> Result<String, BoxError> {
    Ok(serde_json::to_string(&[body])?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_and_aliases_resolve() {
        assert_eq!("scenario1".parse::<ScenarioKind>().unwrap(), ScenarioKind::Roster);
        assert_eq!(" Detections ".parse::<ScenarioKind>().unwrap(), ScenarioKind::Detections);
        assert!(matches!(
            "scenario9".parse::<ScenarioKind>(),
            Err(ConfigError::UnknownScenario(_))
        ));
        for kind in ScenarioKind::ALL {
            assert_eq!(kind.name().parse::<ScenarioKind>().unwrap(), kind);
        }
    }

    #[test]
    fn designed_pacing() {
        assert_eq!(ScenarioKind::Roster.default_rate().hz(), 10.0);
        assert_eq!(ScenarioKind::Roster.default_recurrence().count(), Some(20));
        assert_eq!(ScenarioKind::Detections.default_rate().hz(), 48.0);
        assert_eq!(ScenarioKind::Detections.default_recurrence().count(), Some(12));
    }

    #[test]
    fn payload_is_a_one_element_array() {
        #[derive(Serialize)]
        struct Body {
            n: u8,
        }
        assert_eq!(wrap_payload(&Body { n: 7 }).unwrap(), r#"[{"n":7}]"#);
    }

    #[test]
    fn build_without_assets_still_produces() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut setup = ScenarioKind::Roster.build(dir.path()).unwrap();
        let payload = setup.producer.next_payload().unwrap();
        let value: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(value[0]["user_name"], "user-0");
        assert_eq!(value[0]["name"], "unknown");
    }
}
