// SPDX-License-Identifier: MIT
use crate::recording::format::Recording;
use crate::{Error, Result};

/// The pair of frame numbers a windowed query compares.
///
/// `past` trails `current` by half the requested window length (floor
/// division), so the look-back distance is `requested / 2` frames, not
/// `requested - 1`. Callers wanting a look-back of exactly `k` frames pass
/// a window of `2 * k`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameWindow {
    pub current: u64,
    pub past: u64,
}

impl FrameWindow {
    /// The look-back distance in frames.
    #[must_use]
    pub fn gap(&self) -> u64 {
        self.current - self.past
    }
}

/// Rejects windows too short to define a displacement. Runs before any
/// file I/O.
///
/// # Errors
///
/// Returns [`Error::WindowTooSmall`] when `requested_frames < 2`.
pub fn validate(requested_frames: u64) -> Result<()> {
    if requested_frames < 2 {
        return Err(Error::WindowTooSmall(requested_frames));
    }
    Ok(())
}

/// Maps a requested window length onto the two frames to compare.
///
/// `current` is the highest frame number in the recording; `past` is
/// `current - requested_frames / 2` and must itself be present — a window
/// reaching before the first recorded frame is refused rather than clamped,
/// since clamping would silently change what the resulting velocity means.
///
/// # Errors
///
/// Returns [`Error::WindowTooSmall`] for windows under two frames,
/// [`Error::EmptyRecording`] when no frames exist, and
/// [`Error::InsufficientHistory`] when the past frame is absent.
pub fn resolve(recording: &Recording, requested_frames: u64) -> Result<FrameWindow> {
    validate(requested_frames)?;

    let current = recording.last_frame().ok_or(Error::EmptyRecording)?;
    let lookback = requested_frames / 2;

    let past = current
        .checked_sub(lookback)
        .ok_or(Error::InsufficientHistory {
            requested: requested_frames,
            past: 0,
        })?;

    if !recording.contains_frame(past) {
        return Err(Error::InsufficientHistory {
            requested: requested_frames,
            past,
        });
    }

    Ok(FrameWindow { current, past })
}
