//! # Detections Scenario (`scenario2`)
//!
//! `FrameDetections` bodies with a single detected item. The item sequence is
//! ten frames of track 1 ("Fuego"), one of track 2 ("Humo"), then track 3
//! ("Chispas") for every frame after that. Confidence (0.0..=100.0, one
//! decimal) and the four bbox corners (integer coordinates 0..=100) are random.

use std::num::NonZeroU64;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use super::wrap_payload;
use crate::core::{BoxError, PayloadProducer};

/// Designed rate.
pub const RATE_HZ: f64 = 48.0;
/// Designed message count: 10 + 1 + 1.
pub const COUNT: NonZeroU64 = match NonZeroU64::new(12) {
    Some(n) => n,
    None => unreachable!(),
};

const FIRE_FRAMES: u64 = 10;

/// Top-level detection message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameDetections {
    /// Always `"FrameDetections"`.
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Frame metadata.
    pub properties: FrameProperties,
    /// Objects detected in the frame.
    pub items: Vec<DetectedObject>,
}

/// Frame metadata block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameProperties {
    /// Producing process.
    pub process_id: &'static str,
    /// Flight the frame belongs to.
    pub flight_id: &'static str,
    /// 1-based frame counter of the producer.
    pub frame_index: u64,
    /// Unix epoch milliseconds at build time.
    pub timestamp: i64,
    /// Free-form category tag.
    pub category: &'static str,
}

/// One detected object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectedObject {
    /// Four `[x, y]` corners.
    pub bbox: [[u8; 2]; 4],
    /// Tracker id.
    pub track_id: u32,
    /// Detected class label.
    pub class_name: &'static str,
    /// Confidence percentage, one decimal.
    pub confidence: f64,
    /// Camera the detection came from.
    pub camera: &'static str,
}

/// Track id and class for the `index`-th (0-based) frame.
pub fn track_for(index: u64) -> (u32, &'static str) {
    match index {
        i if i < FIRE_FRAMES => (1, "Fuego"),
        i if i == FIRE_FRAMES => (2, "Humo"),
        _ => (3, "Chispas"),
    }
}

/// Producer for the detections scenario.
pub struct DetectionsProducer {
    seq_index: u64,
    rng: StdRng,
}

impl DetectionsProducer {
    /// Producer seeded from the OS.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Deterministic producer for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self { seq_index: 0, rng }
    }

    /// Builds the next frame and advances the private sequence.
    pub fn next_frame(&mut self) -> FrameDetections {
        let (track_id, class_name) = track_for(self.seq_index);
        let confidence = (self.rng.random_range(0.0..=100.0_f64) * 10.0).round() / 10.0;

        let mut bbox = [[0u8; 2]; 4];
        for corner in bbox.iter_mut() {
            *corner = [self.rng.random_range(0..=100), self.rng.random_range(0..=100)];
        }

        self.seq_index += 1;
        FrameDetections {
            kind: "FrameDetections",
            properties: FrameProperties {
                process_id: "process_001",
                flight_id: "1",
                frame_index: self.seq_index,
                timestamp: Utc::now().timestamp_millis(),
                category: "test",
            },
            items: vec![DetectedObject {
                bbox,
                track_id,
                class_name,
                confidence,
                camera: "opt",
            }],
        }
    }
}

impl Default for DetectionsProducer {
    fn default() -> Self {
        Self::new()
    }
}

impl PayloadProducer for DetectionsProducer {
    fn next_payload(&mut self) -> Result<String, BoxError> {
        wrap_payload(&self.next_frame())
    }
}
