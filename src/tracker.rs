// SPDX-License-Identifier: MIT
use std::path::{Path, PathBuf};

use crate::recording::format::{FramePosition, Recording};
use crate::recording::reader;
use crate::{Error, Result, kinematics};

/// Default capture rate in frames per second.
pub const DEFAULT_SAMPLE_RATE: f64 = 120.0;

/// Default trailing window, in frames, for distance and velocity queries.
pub const DEFAULT_WINDOW_SIZE: u64 = 5;

/// Windowed kinematics over a growing motion-capture recording.
///
/// The tracker owns only configuration; the recording itself is owned by
/// the capture process that writes the data file. Every query re-reads the
/// file in full, derives "current" from the freshest frame on disk, and
/// returns a value — no cache, no cursor, no background work. The data
/// path may be rebound between calls when a new trial starts recording.
#[derive(Clone, Debug)]
pub struct MotionTracker {
    sample_rate: f64,
    window_size: u64,
    marker_count: usize,
    data_path: Option<PathBuf>,
}

impl MotionTracker {
    /// Creates a tracker expecting `marker_count` samples per frame, with
    /// the default sample rate and window size and no data source bound.
    #[must_use]
    pub fn new(marker_count: usize) -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            window_size: DEFAULT_WINDOW_SIZE,
            marker_count,
            data_path: None,
        }
    }

    #[must_use]
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidSampleRate`] unless `sample_rate` is a
    /// positive, finite number of frames per second.
    pub fn set_sample_rate(&mut self, sample_rate: f64) -> Result<()> {
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(Error::InvalidSampleRate(sample_rate));
        }
        self.sample_rate = sample_rate;
        Ok(())
    }

    #[must_use]
    pub fn window_size(&self) -> u64 {
        self.window_size
    }

    /// Sets the default window length used when a query omits one. Not
    /// validated here; a too-short window is rejected at query time.
    pub fn set_window_size(&mut self, window_size: u64) {
        self.window_size = window_size;
    }

    /// Markers expected per frame. Informational only: queries never
    /// re-derive or enforce it, but capture-file audits report against it.
    #[must_use]
    pub fn marker_count(&self) -> usize {
        self.marker_count
    }

    #[must_use]
    pub fn data_path(&self) -> Option<&Path> {
        self.data_path.as_deref()
    }

    /// Binds the capture file to query. The path is not checked here; an
    /// unreadable or malformed file surfaces on the next query.
    pub fn set_data_path(&mut self, path: impl Into<PathBuf>) {
        self.data_path = Some(path.into());
    }

    /// Unbinds the capture file, e.g. between trials.
    pub fn clear_data_path(&mut self) {
        self.data_path = None;
    }

    /// The centroid of the most recent recorded frame, tagged with its
    /// frame number.
    ///
    /// # Errors
    ///
    /// Propagates every load error from the frame store, plus
    /// [`Error::EmptyRecording`] when the file holds no samples yet.
    pub fn position(&self) -> Result<FramePosition> {
        let recording = self.load()?;
        let current = recording.last_frame().ok_or(Error::EmptyRecording)?;
        recording
            .frame_position(current)
            .ok_or(Error::EmptyFrame(current))
    }

    /// Distance traveled by the centroid over a trailing window of
    /// `window_frames` frames (default: the configured window size).
    ///
    /// The look-back distance is half the window length; see
    /// [`kinematics::window::FrameWindow`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::WindowTooSmall`] before any I/O when the window is
    /// under two frames; otherwise propagates load, empty-recording, and
    /// insufficient-history errors.
    pub fn distance(&self, window_frames: Option<u64>) -> Result<f64> {
        let requested = window_frames.unwrap_or(self.window_size);
        kinematics::window::validate(requested)?;

        let recording = self.load()?;
        let win = kinematics::window::resolve(&recording, requested)?;
        kinematics::displacement(&recording, &win)
    }

    /// Windowed velocity: the distance over the window divided by the
    /// elapsed time the look-back spans (`gap / sample_rate` seconds).
    ///
    /// # Errors
    ///
    /// Same conditions as [`MotionTracker::distance`].
    pub fn velocity(&self, window_frames: Option<u64>) -> Result<f64> {
        let requested = window_frames.unwrap_or(self.window_size);
        kinematics::window::validate(requested)?;

        let recording = self.load()?;
        let win = kinematics::window::resolve(&recording, requested)?;
        let distance = kinematics::displacement(&recording, &win)?;

        #[allow(clippy::cast_precision_loss)]
        let gap = win.gap() as f64;
        let elapsed = gap / self.sample_rate;
        Ok(distance / elapsed)
    }

    /// Fresh snapshot of the bound capture file.
    fn load(&self) -> Result<Recording> {
        let path = self
            .data_path
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or(Error::NoDataSource)?;
        reader::load(path)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)] // exact equality is the contract under test
mod tests {
    use std::fmt::Write as _;
    use std::path::PathBuf;

    use super::*;

    /// Ten frames, three markers per frame: frame `f` carries markers at
    /// `f-1`, `f`, and `f+1` on every axis, so frame `f`'s centroid is
    /// `(f, f, f)` and the centroid moves one unit per axis per frame.
    fn write_capture(dir_name: &str) -> PathBuf {
        let mut content = String::from("frame_number,pos_x,pos_y,pos_z\n");
        for frame in 1_i64..=10 {
            for offset in [-1_i64, 0, 1] {
                let v = frame + offset;
                writeln!(content, "{frame},{v}.0,{v}.0,{v}.0").unwrap();
            }
        }

        let dir = std::env::temp_dir().join(dir_name);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("capture.csv");
        std::fs::write(&path, content).unwrap();
        path
    }

    fn cleanup(path: &PathBuf) {
        std::fs::remove_file(path).ok();
        if let Some(dir) = path.parent() {
            std::fs::remove_dir(dir).ok();
        }
    }

    fn tracker_over(path: &PathBuf) -> MotionTracker {
        let mut tracker = MotionTracker::new(3);
        tracker.set_data_path(path);
        tracker
    }

    #[test]
    fn new_tracker_has_documented_defaults() {
        let tracker = MotionTracker::new(3);
        assert_eq!(tracker.sample_rate(), 120.0);
        assert_eq!(tracker.window_size(), 5);
        assert_eq!(tracker.marker_count(), 3);
        assert!(tracker.data_path().is_none());
    }

    #[test]
    fn configuration_is_mutable_between_calls() {
        let mut tracker = MotionTracker::new(3);

        tracker.set_sample_rate(60.0).unwrap();
        assert_eq!(tracker.sample_rate(), 60.0);

        tracker.set_window_size(10);
        assert_eq!(tracker.window_size(), 10);

        tracker.set_data_path("/new/path");
        assert_eq!(tracker.data_path(), Some(Path::new("/new/path")));

        tracker.clear_data_path();
        assert!(tracker.data_path().is_none());
    }

    #[test]
    fn nonpositive_sample_rate_is_rejected() {
        let mut tracker = MotionTracker::new(1);
        assert!(matches!(
            tracker.set_sample_rate(0.0),
            Err(Error::InvalidSampleRate(_))
        ));
        assert!(matches!(
            tracker.set_sample_rate(-120.0),
            Err(Error::InvalidSampleRate(_))
        ));
        assert_eq!(tracker.sample_rate(), DEFAULT_SAMPLE_RATE);
    }

    #[test]
    fn unset_data_path_is_a_configuration_error() {
        let tracker = MotionTracker::new(1);
        let err = tracker.position().unwrap_err();
        assert!(matches!(err, Error::NoDataSource));
        assert_eq!(err.to_string(), "No data directory was set.");
    }

    #[test]
    fn empty_data_path_is_a_configuration_error() {
        let mut tracker = MotionTracker::new(1);
        tracker.set_data_path("");
        assert!(matches!(tracker.position(), Err(Error::NoDataSource)));
        assert!(matches!(tracker.distance(None), Err(Error::NoDataSource)));
        assert!(matches!(tracker.velocity(None), Err(Error::NoDataSource)));
    }

    #[test]
    fn nonexistent_data_path_is_not_found() {
        let mut tracker = MotionTracker::new(1);
        tracker.set_data_path("/nonexistent/path");
        assert!(matches!(tracker.position(), Err(Error::DataNotFound(_))));
    }

    #[test]
    fn short_window_is_rejected_before_any_io() {
        // no data path bound: a load attempt would fail with NoDataSource,
        // so getting WindowTooSmall proves validation ran first
        let tracker = MotionTracker::new(1);
        assert!(matches!(
            tracker.velocity(Some(1)),
            Err(Error::WindowTooSmall(1))
        ));
        assert!(matches!(
            tracker.distance(Some(0)),
            Err(Error::WindowTooSmall(0))
        ));
    }

    #[test]
    fn position_is_latest_frame_centroid() {
        let path = write_capture("kinwatch_tracker_position");
        let tracker = tracker_over(&path);

        let pos = tracker.position().unwrap();
        assert_eq!(pos.frame_number, 10);
        assert_eq!(pos.pos_x, 10.0);
        assert_eq!(pos.pos_y, 10.0);
        assert_eq!(pos.pos_z, 10.0);

        cleanup(&path);
    }

    #[test]
    fn distance_over_explicit_window() {
        let path = write_capture("kinwatch_tracker_distance");
        let tracker = tracker_over(&path);

        // window 2 -> look-back 1 frame, one unit per axis
        assert_eq!(tracker.distance(Some(2)).unwrap(), 3.0_f64.sqrt());

        cleanup(&path);
    }

    #[test]
    fn distance_over_default_window() {
        let path = write_capture("kinwatch_tracker_distance_default");
        let tracker = tracker_over(&path);

        // default window 5 -> look-back 2 frames, two units per axis
        assert_eq!(tracker.distance(None).unwrap(), 12.0_f64.sqrt());

        cleanup(&path);
    }

    #[test]
    fn velocity_over_explicit_window() {
        let path = write_capture("kinwatch_tracker_velocity");
        let tracker = tracker_over(&path);

        assert_eq!(
            tracker.velocity(Some(2)).unwrap(),
            3.0_f64.sqrt() / (1.0 / 120.0)
        );

        cleanup(&path);
    }

    #[test]
    fn velocity_over_default_window() {
        let path = write_capture("kinwatch_tracker_velocity_default");
        let tracker = tracker_over(&path);

        assert_eq!(
            tracker.velocity(None).unwrap(),
            12.0_f64.sqrt() / (2.0 / 120.0)
        );

        cleanup(&path);
    }

    #[test]
    fn distance_grows_with_window_under_constant_velocity() {
        let path = write_capture("kinwatch_tracker_monotone");
        let tracker = tracker_over(&path);

        let mut previous = 0.0;
        for window in [2, 4, 6, 8, 10] {
            let d = tracker.distance(Some(window)).unwrap();
            assert!(d >= previous, "window {window}: {d} < {previous}");
            previous = d;
        }

        cleanup(&path);
    }

    #[test]
    fn velocity_scales_with_sample_rate() {
        let path = write_capture("kinwatch_tracker_rate_scaling");
        let mut tracker = tracker_over(&path);

        let at_120 = tracker.velocity(None).unwrap();
        tracker.set_sample_rate(60.0).unwrap();
        let at_60 = tracker.velocity(None).unwrap();

        // same frame gap, half the rate: twice the elapsed time, half the
        // velocity, exactly (the rate ratio is a power of two)
        assert_eq!(at_120, 2.0 * at_60);

        cleanup(&path);
    }

    #[test]
    fn repeated_queries_are_idempotent() {
        let path = write_capture("kinwatch_tracker_idempotent");
        let tracker = tracker_over(&path);

        assert_eq!(tracker.position().unwrap(), tracker.position().unwrap());
        assert_eq!(
            tracker.distance(None).unwrap(),
            tracker.distance(None).unwrap()
        );
        assert_eq!(
            tracker.velocity(Some(4)).unwrap(),
            tracker.velocity(Some(4)).unwrap()
        );

        cleanup(&path);
    }

    #[test]
    fn window_longer_than_history_fails_loudly() {
        let path = write_capture("kinwatch_tracker_history");
        let tracker = tracker_over(&path);

        // look-back of 10 frames would need frame 0
        assert!(matches!(
            tracker.distance(Some(20)),
            Err(Error::InsufficientHistory { .. })
        ));

        cleanup(&path);
    }

    #[test]
    fn appended_rows_are_visible_on_the_next_query() {
        let path = write_capture("kinwatch_tracker_append");
        let tracker = tracker_over(&path);

        assert_eq!(tracker.position().unwrap().frame_number, 10);

        let mut extra = String::new();
        for v in [10, 11, 12] {
            writeln!(extra, "11,{v}.0,{v}.0,{v}.0").unwrap();
        }
        let mut content = std::fs::read_to_string(&path).unwrap();
        content.push_str(&extra);
        std::fs::write(&path, content).unwrap();

        let pos = tracker.position().unwrap();
        assert_eq!(pos.frame_number, 11);
        assert_eq!(pos.pos_x, 11.0);

        cleanup(&path);
    }
}
