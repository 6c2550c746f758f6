//! Frame-synchronous orchestration of the beat tracking pipeline

use serde::{Deserialize, Serialize};

use crate::config::TrackerConfig;
use crate::error::TrackerError;
use crate::features::onset::OnsetDetector;
use crate::features::schedule::BeatScheduler;
use crate::features::score::BeatScoreTracker;
use crate::features::tempo::TempoEstimator;

/// Per-frame pipeline output
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameOutput {
    /// Index of the frame within the session, starting at 0
    pub frame_index: u64,

    /// Onset strength of this frame
    pub onset: f32,

    /// Current tempo period estimate in frames (0 before tempo stabilizes)
    pub tempo_period: usize,

    /// Tempo period converted to BPM (0.0 while the period is degenerate)
    pub bpm: f32,

    /// Whether this frame was declared a beat
    pub is_beat: bool,

    /// Latency-compensated trigger for the external beat indicator
    pub trigger: bool,
}

/// Read-only view of the rolling internal traces, for external visualization
///
/// The three window buffers share `cursor`; `correlation` is indexed by lag
/// and has its own length (the configured max lag).
#[derive(Debug, Clone, Copy)]
pub struct Diagnostics<'a> {
    /// Onset strength history, physical buffer order
    pub onsets: &'a [f32],

    /// DP score function, physical buffer order
    pub score: &'a [f32],

    /// Beat flags (0.0 / 1.0), physical buffer order
    pub beats: &'a [f32],

    /// Write cursor shared by the three window buffers
    pub cursor: usize,

    /// Weighted autocorrelation curve, indexed by lag
    pub correlation: &'a [f32],
}

/// Real-time beat tracker
///
/// Owns the per-session state of all pipeline components. One call to
/// [`process_frame`](Self::process_frame) per spectral frame, from a single
/// thread, in strict temporal order; the call must complete within one frame
/// period to keep pace with live audio.
#[derive(Debug, Clone)]
pub struct Tracker {
    config: TrackerConfig,
    onset: OnsetDetector,
    tempo: TempoEstimator,
    score: BeatScoreTracker,
    scheduler: BeatScheduler,
    frame_index: u64,
    last_period: usize,
}

impl Tracker {
    /// Create a tracker session from a validated configuration
    ///
    /// All buffers are allocated here, once; no further allocation happens
    /// per frame.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::InvalidConfig` if the configuration fails
    /// validation; the session refuses to start rather than run with
    /// undefined buffer sizes.
    pub fn new(config: TrackerConfig) -> Result<Self, TrackerError> {
        config.validate()?;

        let frame_period = config.frame_period();
        log::debug!(
            "Starting beat tracking session: {} bands, frame period {:.2} ms, window {} frames, max lag {}",
            config.n_bands,
            1000.0 * frame_period,
            config.window_len,
            config.max_lag
        );

        Ok(Self {
            onset: OnsetDetector::new(config.n_bands, config.onset_floor_db, config.onset_scale),
            tempo: TempoEstimator::new(
                config.max_lag,
                config.decay,
                frame_period,
                config.ref_tempo_bpm,
                config.octave_width,
            ),
            score: BeatScoreTracker::new(config.window_len, config.refractory_divisor),
            scheduler: BeatScheduler::new(config.delay_len, config.delay_read_offset),
            frame_index: 0,
            last_period: 0,
            config,
        })
    }

    /// Process one spectral frame and return this frame's outputs
    ///
    /// Runs the full pipeline: onset detection, tempo estimation, the DP
    /// beat decision and trigger scheduling.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::InvalidInput` if the frame's band count differs
    /// from the configured one. The session state is untouched in that case,
    /// so the caller may recover by fixing its analyzer output.
    pub fn process_frame(&mut self, frame: &[f32]) -> Result<FrameOutput, TrackerError> {
        if frame.len() != self.config.n_bands {
            return Err(TrackerError::InvalidInput(format!(
                "Expected {} bands per frame, got {}",
                self.config.n_bands,
                frame.len()
            )));
        }

        let onset = self.onset.compute(frame);
        let tempo_period = self.tempo.update(onset);

        // Snapshot the live-adjustable weight once per frame so an external
        // adjustment can never tear a single DP pass
        let alpha = self.config.alpha;
        let is_beat = self.score.step(onset, tempo_period, alpha);
        let trigger = self.scheduler.push(is_beat);

        self.last_period = tempo_period;
        let output = FrameOutput {
            frame_index: self.frame_index,
            onset,
            tempo_period,
            bpm: self.current_bpm(),
            is_beat,
            trigger,
        };
        self.frame_index += 1;

        log::trace!(
            "Frame {}: onset {:.4}, period {}, beat {}",
            output.frame_index,
            onset,
            tempo_period,
            is_beat
        );

        Ok(output)
    }

    /// Adjust the onset-versus-tempo-deviation trade-off weight live
    ///
    /// Takes effect from the next `process_frame` call.
    pub fn set_alpha(&mut self, alpha: f32) {
        self.config.alpha = alpha;
    }

    /// Most recent tempo estimate in BPM, 0.0 while the period is degenerate
    pub fn current_bpm(&self) -> f32 {
        if self.last_period == 0 {
            return 0.0;
        }
        60.0 / (self.last_period as f32 * self.config.frame_period())
    }

    /// Session configuration
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Rolling internal traces for external visualization
    pub fn diagnostics(&self) -> Diagnostics<'_> {
        Diagnostics {
            onsets: self.score.onset_history(),
            score: self.score.score_function(),
            beats: self.score.beat_flags(),
            cursor: self.score.cursor(),
            correlation: self.tempo.correlation_curve(),
        }
    }
}
