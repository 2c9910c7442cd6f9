// SPDX-License-Identifier: MIT
use serde::{Deserialize, Serialize};

/// Column names a capture file must carry, in canonical order. The reader
/// accepts them in any order but requires exactly this set.
pub const REQUIRED_COLUMNS: [&str; 4] = ["frame_number", "pos_x", "pos_y", "pos_z"];

/// One marker observation: a single CSV row of the capture file.
///
/// Several samples may share a `frame_number`, one per physical marker
/// tracked during that frame.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Sample {
    pub frame_number: u64,
    pub pos_x: f64,
    pub pos_y: f64,
    pub pos_z: f64,
}

/// The centroid of one frame, tagged with its frame number.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FramePosition {
    pub frame_number: u64,
    pub pos_x: f64,
    pub pos_y: f64,
    pub pos_z: f64,
}

/// An immutable snapshot of a capture file: every sample recorded so far,
/// in file row order.
#[derive(Clone, Debug, Default)]
pub struct Recording {
    samples: Vec<Sample>,
}

impl Recording {
    #[must_use]
    pub fn new(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    #[must_use]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The most recent fully recorded frame number, if any.
    #[must_use]
    pub fn last_frame(&self) -> Option<u64> {
        self.samples.iter().map(|s| s.frame_number).max()
    }

    /// The earliest recorded frame number, if any.
    #[must_use]
    pub fn first_frame(&self) -> Option<u64> {
        self.samples.iter().map(|s| s.frame_number).min()
    }

    #[must_use]
    pub fn contains_frame(&self, frame_number: u64) -> bool {
        self.samples.iter().any(|s| s.frame_number == frame_number)
    }

    /// Number of samples recorded for one frame (markers seen that frame).
    #[must_use]
    pub fn frame_sample_count(&self, frame_number: u64) -> usize {
        self.samples
            .iter()
            .filter(|s| s.frame_number == frame_number)
            .count()
    }

    /// Number of distinct frame numbers present.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        let mut frames: Vec<u64> = self.samples.iter().map(|s| s.frame_number).collect();
        frames.sort_unstable();
        frames.dedup();
        frames.len()
    }

    /// The centroid of `frame_number`: per-axis arithmetic mean over every
    /// sample recorded for that frame. Sums each axis first and divides
    /// once, so the result does not depend on sample order.
    ///
    /// Returns `None` when no samples exist for the frame.
    #[must_use]
    pub fn frame_position(&self, frame_number: u64) -> Option<FramePosition> {
        let (mut x, mut y, mut z) = (0.0_f64, 0.0_f64, 0.0_f64);
        let mut count: usize = 0;

        for s in &self.samples {
            if s.frame_number == frame_number {
                x += s.pos_x;
                y += s.pos_y;
                z += s.pos_z;
                count += 1;
            }
        }

        if count == 0 {
            return None;
        }

        #[allow(clippy::cast_precision_loss)]
        let n = count as f64;
        Some(FramePosition {
            frame_number,
            pos_x: x / n,
            pos_y: y / n,
            pos_z: z / n,
        })
    }
}
