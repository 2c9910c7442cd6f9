// SPDX-License-Identifier: MIT
#![deny(warnings)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use num_format::{Locale, ToFormattedString};

use kinwatch::recording::reader;
use kinwatch::{DEFAULT_SAMPLE_RATE, DEFAULT_WINDOW_SIZE, Error, MotionTracker};

#[derive(Parser)]
#[command(
    name = "kinwatch",
    about = "kinwatch: windowed kinematics monitor for motion-capture recordings"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the centroid of the latest recorded frame
    Position {
        /// Capture file written by the recording process
        data: PathBuf,
    },
    /// Print the distance traveled over a trailing window of frames
    Distance {
        data: PathBuf,
        /// Window length in frames (default: the tracker's window size)
        #[arg(short, long)]
        window: Option<u64>,
    },
    /// Print the windowed velocity of the tracked centroid
    Velocity {
        data: PathBuf,
        #[arg(short, long)]
        window: Option<u64>,
        /// Capture rate in frames per second
        #[arg(short, long, default_value_t = DEFAULT_SAMPLE_RATE)]
        sample_rate: f64,
    },
    /// Validate a capture file and summarize its frames
    Check {
        data: PathBuf,
        /// Markers expected per frame
        #[arg(short, long, default_value = "3")]
        markers: usize,
    },
    /// Poll a growing capture file and stream velocity updates
    Watch {
        data: PathBuf,
        #[arg(short, long, default_value_t = DEFAULT_WINDOW_SIZE)]
        window: u64,
        #[arg(short, long, default_value_t = DEFAULT_SAMPLE_RATE)]
        sample_rate: f64,
        /// Poll interval in milliseconds
        #[arg(short, long, default_value = "250")]
        interval: u64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Position { data } => cmd_position(&data),
        Commands::Distance { data, window } => cmd_distance(&data, window),
        Commands::Velocity {
            data,
            window,
            sample_rate,
        } => cmd_velocity(&data, window, sample_rate),
        Commands::Check { data, markers } => cmd_check(&data, markers),
        Commands::Watch {
            data,
            window,
            sample_rate,
            interval,
        } => cmd_watch(&data, window, sample_rate, interval),
    }
}

// ---------------------------------------------------------------------------
// Signal handling
// ---------------------------------------------------------------------------

fn install_signal_handler() -> Result<Arc<AtomicBool>> {
    let shutdown = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(signal_hook::consts::SIGINT, Arc::clone(&shutdown))
        .context("failed to register SIGINT handler")?;
    signal_hook::flag::register(signal_hook::consts::SIGTERM, Arc::clone(&shutdown))
        .context("failed to register SIGTERM handler")?;
    Ok(shutdown)
}

// ---------------------------------------------------------------------------
// One-shot queries
// ---------------------------------------------------------------------------

fn cmd_position(data: &Path) -> Result<()> {
    let tracker = make_tracker(data, None, None)?;
    let pos = tracker.position()?;
    println!(
        "frame {}  pos ({}, {}, {})",
        pos.frame_number, pos.pos_x, pos.pos_y, pos.pos_z
    );
    Ok(())
}

fn cmd_distance(data: &Path, window: Option<u64>) -> Result<()> {
    let tracker = make_tracker(data, None, None)?;
    let distance = tracker.distance(window)?;
    println!("{distance}");
    Ok(())
}

fn cmd_velocity(data: &Path, window: Option<u64>, sample_rate: f64) -> Result<()> {
    let tracker = make_tracker(data, Some(sample_rate), None)?;
    let velocity = tracker.velocity(window)?;
    println!("{velocity}");
    Ok(())
}

fn make_tracker(
    data: &Path,
    sample_rate: Option<f64>,
    window: Option<u64>,
) -> Result<MotionTracker> {
    // marker count is informational and unused by queries; `check` takes
    // its own --markers argument instead
    let mut tracker = MotionTracker::new(0);
    tracker.set_data_path(data);
    if let Some(rate) = sample_rate {
        tracker.set_sample_rate(rate)?;
    }
    if let Some(window) = window {
        tracker.set_window_size(window);
    }
    Ok(tracker)
}

// ---------------------------------------------------------------------------
// Check subcommand
// ---------------------------------------------------------------------------

fn cmd_check(data: &Path, markers: usize) -> Result<()> {
    let recording = reader::load(data)?;

    println!("{}: format OK", data.display());
    println!(
        "  {} samples across {} frames",
        recording.sample_count().to_formatted_string(&Locale::en),
        recording.frame_count().to_formatted_string(&Locale::en),
    );

    let (Some(first), Some(last)) = (recording.first_frame(), recording.last_frame()) else {
        println!("  no frames recorded yet");
        return Ok(());
    };
    println!("  frames {first}..={last}");

    let mut short_frames = 0_usize;
    let mut missing_frames = 0_usize;
    for frame in first..=last {
        match recording.frame_sample_count(frame) {
            0 => missing_frames += 1,
            n if n != markers => short_frames += 1,
            _ => {}
        }
    }

    if missing_frames > 0 {
        println!("  WARNING: {missing_frames} frame number(s) in range have no samples");
    }
    if short_frames > 0 {
        println!("  WARNING: {short_frames} frame(s) deviate from {markers} markers per frame");
    }
    if missing_frames == 0 && short_frames == 0 {
        println!("  every frame carries {markers} marker sample(s)");
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Watch subcommand
// ---------------------------------------------------------------------------

fn cmd_watch(data: &Path, window: u64, sample_rate: f64, interval_ms: u64) -> Result<()> {
    let shutdown = install_signal_handler()?;
    let tracker = make_tracker(data, Some(sample_rate), Some(window))?;
    let interval = Duration::from_millis(interval_ms);

    eprintln!(
        "Watching {} (window {window} frames, {sample_rate} fps) ...",
        data.display()
    );

    loop {
        if shutdown.load(Ordering::Relaxed) {
            eprintln!("\nInterrupted.");
            break;
        }

        match report_once(&tracker) {
            Ok(()) => {}
            // capture still warming up: file absent or too few frames yet
            Err(e) if is_transient(&e) => {}
            Err(e) => return Err(e.into()),
        }

        std::thread::sleep(interval);
    }

    Ok(())
}

fn report_once(tracker: &MotionTracker) -> kinwatch::Result<()> {
    let velocity = tracker.velocity(None)?;
    let pos = tracker.position()?;
    println!(
        "frame {:>8}  pos ({:>10.3}, {:>10.3}, {:>10.3})  velocity {:>10.3}",
        pos.frame_number, pos.pos_x, pos.pos_y, pos.pos_z, velocity
    );
    Ok(())
}

/// Conditions the polling loop waits out rather than aborts on. Retry
/// policy belongs to the caller, and `watch` is that caller.
fn is_transient(err: &Error) -> bool {
    matches!(
        err,
        Error::DataNotFound(_)
            | Error::EmptyRecording
            | Error::EmptyFrame(_)
            | Error::InsufficientHistory { .. }
    )
}
