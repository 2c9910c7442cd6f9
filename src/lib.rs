// SPDX-License-Identifier: MIT
#![deny(warnings)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

//! Windowed motion-kinematics over a growing motion-capture recording.
//!
//! A capture process appends marker samples (one CSV row per marker per
//! frame) to a data file; [`MotionTracker`] answers point-in-time queries
//! against it: the current aggregate position, the distance traveled over a
//! trailing window of frames, and the windowed velocity. Every query
//! re-reads the file from scratch, so samples appended between calls are
//! visible on the next call and no state is carried across queries.

pub mod kinematics;
pub mod recording;
pub mod tracker;

pub use recording::format::{FramePosition, Recording, Sample};
pub use tracker::{DEFAULT_SAMPLE_RATE, DEFAULT_WINDOW_SIZE, MotionTracker};

pub use crate::error::{Error, Result};

mod error {
    use std::path::PathBuf;

    use thiserror::Error;

    /// Errors surfaced by tracker queries.
    ///
    /// None of these are retried internally; whether to wait for more frames
    /// and ask again is the calling loop's decision.
    #[derive(Error, Debug)]
    pub enum Error {
        /// The data-source path was never set, or was set to an empty string.
        #[error("No data directory was set.")]
        NoDataSource,

        /// The configured data-source path does not resolve to a file.
        #[error("data file not found: {0}")]
        DataNotFound(PathBuf),

        /// The data file is missing one or more of the required columns.
        #[error("Data file must contain columns named frame, pos_x, pos_y, pos_z.")]
        InvalidFormat,

        /// A single frame cannot define a displacement.
        #[error("Window size must cover at least two frames.")]
        WindowTooSmall(u64),

        /// The requested window reaches back past the first recorded frame.
        #[error(
            "insufficient history: window of {requested} frames needs frame {past}, \
             which is not in the recording"
        )]
        InsufficientHistory { requested: u64, past: u64 },

        /// The recording contains no samples yet.
        #[error("recording is empty: no frames recorded yet")]
        EmptyRecording,

        /// No samples exist for the referenced frame number.
        #[error("frame {0} has no recorded samples")]
        EmptyFrame(u64),

        /// Sample rate must be a positive number of frames per second.
        #[error("sample rate must be positive, got {0}")]
        InvalidSampleRate(f64),

        #[error("IO error: {0}")]
        Io(#[from] std::io::Error),

        #[error("CSV error: {0}")]
        Csv(#[from] csv::Error),
    }

    /// Result type for tracker operations.
    pub type Result<T> = std::result::Result<T, Error>;
}
