//! # Roster Scenario (`scenario1`)
//!
//! Quick-check body `{name, user_name, sent_messages}`:
//! - `name` is picked at random from `<assets>/scenario1/names.json`, falling
//!   back to `"unknown"`;
//! - `user_name` walks `<assets>/scenario1/user_names.json` round-robin, or is
//!   `user-<index>` when that list is empty;
//! - `sent_messages` counts the messages this producer has built.

use std::num::NonZeroU64;
use std::path::Path;

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use serde::Serialize;

use super::assets::load_list;
use super::wrap_payload;
use crate::core::{BoxError, ConfigError, PayloadProducer};

/// Designed rate.
pub const RATE_HZ: f64 = 10.0;
/// Designed message count.
pub const COUNT: NonZeroU64 = match NonZeroU64::new(20) {
    Some(n) => n,
    None => unreachable!(),
};

const FALLBACK_NAME: &str = "unknown";

/// One roster message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterBody {
    /// Display name.
    pub name: String,
    /// Sequential user name.
    pub user_name: String,
    /// 1-based count of messages built by the producer.
    pub sent_messages: u64,
}

/// Producer for the roster scenario.
pub struct RosterProducer {
    names: Vec<String>,
    user_names: Vec<String>,
    seq_index: u64,
    rng: StdRng,
}

impl RosterProducer {
    /// Producer over explicit lists, seeded from the OS.
    pub fn new(names: Vec<String>, user_names: Vec<String>) -> Self {
        Self::with_rng(names, user_names, StdRng::from_os_rng())
    }

    /// Deterministic producer for reproducible runs.
    pub fn seeded(names: Vec<String>, user_names: Vec<String>, seed: u64) -> Self {
        Self::with_rng(names, user_names, StdRng::seed_from_u64(seed))
    }

    fn with_rng(names: Vec<String>, user_names: Vec<String>, rng: StdRng) -> Self {
        Self {
            names,
            user_names,
            seq_index: 0,
            rng,
        }
    }

    /// Loads both lists from `<assets_dir>/scenario1/`.
    pub fn from_assets(assets_dir: &Path) -> Result<Self, ConfigError> {
        let dir = assets_dir.join("scenario1");
        let names = load_list(&dir.join("names.json"))?;
        let user_names = load_list(&dir.join("user_names.json"))?;
        log::debug!(
            "Roster assets: {} name(s), {} user name(s)",
            names.len(),
            user_names.len()
        );
        Ok(Self::new(names, user_names))
    }

    /// Builds the next body and advances the private sequence.
    pub fn next_body(&mut self) -> RosterBody {
        let name = self
            .names
            .choose(&mut self.rng)
            .filter(|n| !n.is_empty())
            .cloned()
            .unwrap_or_else(|| FALLBACK_NAME.to_string());

        let user_name = if self.user_names.is_empty() {
            format!("user-{}", self.seq_index)
        } else {
            let slot = (self.seq_index % self.user_names.len() as u64) as usize;
            self.user_names[slot].clone()
        };

        self.seq_index += 1;
        RosterBody {
            name,
            user_name,
            sent_messages: self.seq_index,
        }
    }
}

impl PayloadProducer for RosterProducer {
    fn next_payload(&mut self) -> Result<String, BoxError> {
        wrap_payload(&self.next_body())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn user_names_rotate_and_counter_increments() {
        let mut producer = RosterProducer::seeded(strings(&["ana"]), strings(&["u-a", "u-b"]), 7);
        let bodies: Vec<_> = (0..3).map(|_| producer.next_body()).collect();

        assert_eq!(
            bodies.iter().map(|b| b.user_name.as_str()).collect::<Vec<_>>(),
            vec!["u-a", "u-b", "u-a"]
        );
        assert_eq!(
            bodies.iter().map(|b| b.sent_messages).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert!(bodies.iter().all(|b| b.name == "ana"));
    }

    #[test]
    fn empty_lists_fall_back() {
        let mut producer = RosterProducer::seeded(Vec::new(), Vec::new(), 1);
        let first = producer.next_body();
        let second = producer.next_body();
        assert_eq!(first.name, "unknown");
        assert_eq!(first.user_name, "user-0");
        assert_eq!(second.user_name, "user-1");
    }

    #[test]
    fn blank_name_pick_becomes_unknown() {
        let mut producer = RosterProducer::seeded(strings(&[""]), Vec::new(), 3);
        assert_eq!(producer.next_body().name, "unknown");
    }

    #[test]
    fn names_are_drawn_from_the_list() {
        let names = strings(&["ana", "luis", "marta"]);
        let mut producer = RosterProducer::seeded(names.clone(), Vec::new(), 42);
        for _ in 0..20 {
            assert!(names.contains(&producer.next_body().name));
        }
    }

    #[test]
    fn separate_producers_do_not_share_sequence() {
        let mut a = RosterProducer::seeded(Vec::new(), Vec::new(), 1);
        let mut b = RosterProducer::seeded(Vec::new(), Vec::new(), 1);
        a.next_body();
        a.next_body();
        assert_eq!(b.next_body().sent_messages, 1);
    }

    #[test]
    fn payload_wraps_body_in_array() {
        let mut producer = RosterProducer::seeded(strings(&["ana"]), strings(&["u-a"]), 0);
        assert_eq!(
            producer.next_payload().unwrap(),
            r#"[{"name":"ana","user_name":"u-a","sent_messages":1}]"#
        );
    }
}
