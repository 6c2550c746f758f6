//! # Cadence DSP
//!
//! A real-time beat tracking engine: feed it one spectral frame per analysis
//! period and it answers, frame by frame, "is now a beat?" — with no
//! lookahead, no per-frame allocation, and a bounded per-frame cost.
//!
//! ## Pipeline
//!
//! ```text
//! Spectral frame -> Onset strength -> Tempo estimate -> Beat decision -> Delayed trigger
//! ```
//!
//! - **Onset detection**: sum of per-band dB increases since the previous frame
//! - **Tempo estimation**: online autocorrelation with an exponential moving
//!   average per lag and a Gaussian log-tempo prior centered at 120 BPM
//! - **Beat decision**: causal dynamic-programming recurrence over a rolling
//!   window, with a refractory period against double-triggers
//! - **Trigger scheduling**: a short delay line aligning the trigger with
//!   downstream output latency
//!
//! Audio capture, the short-time spectral transform, and playback of a beat
//! indicator are the caller's responsibility; the engine consumes ready-made
//! log-frequency band magnitudes and emits decisions.
//!
//! ## Quick Start
//!
//! ```
//! use cadence_dsp::{Tracker, TrackerConfig};
//!
//! let config = TrackerConfig {
//!     n_bands: 32,
//!     ..Default::default()
//! };
//! let mut tracker = Tracker::new(config)?;
//!
//! // Once per analysis period, with magnitudes from your spectral analyzer:
//! let frame = vec![0.0f32; 32];
//! let out = tracker.process_frame(&frame)?;
//! if out.trigger {
//!     // schedule the audible/visual beat indicator now
//! }
//! # Ok::<(), cadence_dsp::TrackerError>(())
//! ```
//!
//! ## Concurrency
//!
//! The engine is single-threaded and frame-synchronous: one `process_frame`
//! call per spectral frame, from one thread, in strict temporal order. If the
//! capture path is threaded, deliver frames to a single consumer exactly once
//! each; out-of-order or dropped frames corrupt the rolling history.
//!
//! # Reference
//!
//! Ellis, D. P. W. (2007). Beat Tracking by Dynamic Programming.
//! *Journal of New Music Research*, 36(1), 51-60.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod features;
pub mod ring;
pub mod tracker;

// Re-export main types
pub use config::TrackerConfig;
pub use error::TrackerError;
pub use tracker::{Diagnostics, FrameOutput, Tracker};

/// Track a pre-collected sequence of spectral frames
///
/// Convenience wrapper for offline runs over recorded frames: drives a fresh
/// [`Tracker`] through the whole sequence and collects every per-frame output.
/// Real-time callers should hold a `Tracker` and call
/// [`process_frame`](Tracker::process_frame) per period instead.
///
/// # Arguments
///
/// * `frames` - Spectral frames in temporal order, each `config.n_bands` long
/// * `config` - Session configuration
///
/// # Errors
///
/// Returns `TrackerError` if the configuration is invalid, the frame list is
/// empty, or any frame has the wrong band count.
pub fn track_frames(
    frames: &[Vec<f32>],
    config: TrackerConfig,
) -> Result<Vec<FrameOutput>, TrackerError> {
    if frames.is_empty() {
        return Err(TrackerError::InvalidInput(
            "Empty frame sequence".to_string(),
        ));
    }

    log::debug!("Tracking {} pre-collected frames", frames.len());

    let mut tracker = Tracker::new(config)?;
    let mut outputs = Vec::with_capacity(frames.len());
    for frame in frames {
        outputs.push(tracker.process_frame(frame)?);
    }

    let beats = outputs.iter().filter(|o| o.is_beat).count();
    log::debug!(
        "Tracked {} frames: {} beats, final estimate {:.1} BPM",
        outputs.len(),
        beats,
        tracker.current_bpm()
    );

    Ok(outputs)
}
