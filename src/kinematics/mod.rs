// SPDX-License-Identifier: MIT
pub mod window;

use crate::recording::format::Recording;
use crate::{Error, Result};

use self::window::FrameWindow;

/// Euclidean displacement of the frame centroid across a resolved window:
/// the norm of the per-axis difference between the current and past frame
/// positions.
///
/// # Errors
///
/// Returns [`Error::EmptyFrame`] when either referenced frame has no
/// samples in the recording.
pub fn displacement(recording: &Recording, win: &FrameWindow) -> Result<f64> {
    let current = recording
        .frame_position(win.current)
        .ok_or(Error::EmptyFrame(win.current))?;
    let past = recording
        .frame_position(win.past)
        .ok_or(Error::EmptyFrame(win.past))?;

    let dx = current.pos_x - past.pos_x;
    let dy = current.pos_y - past.pos_y;
    let dz = current.pos_z - past.pos_z;

    Ok((dx * dx + dy * dy + dz * dz).sqrt())
}
