//! Configuration parameters for a beat tracking session

use crate::error::TrackerError;

/// Beat tracking session configuration
///
/// All fields are fixed for the lifetime of a session except `alpha`, which
/// may be adjusted live through [`Tracker::set_alpha`](crate::Tracker::set_alpha).
/// The frame period is derived from `sample_rate` and `buffer_size` and is the
/// time base for every tempo-related quantity.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    // Timing
    /// Sample rate of the upstream audio in Hz (default: 44100)
    pub sample_rate: u32,

    /// Analysis buffer length of the external spectral analyzer in samples
    /// (default: 512). One spectral frame arrives every `buffer_size` samples.
    pub buffer_size: usize,

    // Onset detection
    /// Number of log-frequency bands per spectral frame (default: 32)
    ///
    /// Must match the band count produced by the external spectral analyzer;
    /// frames with any other length are rejected.
    pub n_bands: usize,

    /// Floor for the per-band dB conversion (default: -100.0)
    /// Absorbs zero-magnitude bands so the onset function stays finite.
    pub onset_floor_db: f32,

    /// Scale applied to the raw sum of dB increments (default: 1/400)
    pub onset_scale: f32,

    // Tempo estimation
    /// Largest autocorrelation lag tracked, in frames (default: 100)
    pub max_lag: usize,

    /// Exponential smoothing constant for the running autocorrelation,
    /// close to 1 for slow forgetting (default: 0.997)
    pub decay: f32,

    /// Center of the perceptual tempo prior in BPM (default: 120.0)
    pub ref_tempo_bpm: f32,

    /// Width of the perceptual tempo prior in octaves (default: 2.0)
    pub octave_width: f32,

    // Beat scoring
    /// Length of the rolling beat-tracking window, in frames (default: 300)
    pub window_len: usize,

    /// Trade-off weight between onset strength and tempo deviation penalty
    /// (default: 10.0). Adjustable live; snapshotted once per frame.
    pub alpha: f32,

    /// Refractory period divisor: no beat is declared within
    /// `tempo_period / refractory_divisor` frames of the previous one
    /// (default: 4)
    pub refractory_divisor: usize,

    // Trigger scheduling
    /// Length of the trigger delay line, in frames (default: 16)
    pub delay_len: usize,

    /// Slot of the delay line read for the fired trigger (default: 5).
    /// Tuned to the latency of the downstream playback path.
    pub delay_read_offset: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            buffer_size: 512,
            n_bands: 32,
            onset_floor_db: -100.0,
            onset_scale: 1.0 / 400.0,
            max_lag: 100,
            decay: 0.997,
            ref_tempo_bpm: 120.0,
            octave_width: 2.0,
            window_len: 300,
            alpha: 10.0,
            refractory_divisor: 4,
            delay_len: 16,
            delay_read_offset: 5,
        }
    }
}

impl TrackerConfig {
    /// Frame period in seconds, derived from sample rate and buffer length
    pub fn frame_period(&self) -> f32 {
        self.buffer_size as f32 / self.sample_rate as f32
    }

    /// Validate the configuration
    ///
    /// Misconfiguration is a fatal initialization error: the session refuses
    /// to start rather than run with undefined buffer sizes.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::InvalidConfig` describing the first violated rule.
    pub fn validate(&self) -> Result<(), TrackerError> {
        if self.sample_rate == 0 {
            return Err(TrackerError::InvalidConfig(
                "Sample rate must be > 0".to_string(),
            ));
        }

        if self.buffer_size == 0 {
            return Err(TrackerError::InvalidConfig(
                "Buffer size must be > 0".to_string(),
            ));
        }

        if self.n_bands == 0 {
            return Err(TrackerError::InvalidConfig(
                "Band count must be > 0".to_string(),
            ));
        }

        if self.window_len == 0 {
            return Err(TrackerError::InvalidConfig(
                "Window length must be > 0".to_string(),
            ));
        }

        if self.max_lag == 0 || self.max_lag > self.window_len {
            return Err(TrackerError::InvalidConfig(format!(
                "Max lag must be in (0, window_len]: got {} with window_len {}",
                self.max_lag, self.window_len
            )));
        }

        if !(self.decay > 0.0 && self.decay < 1.0) {
            return Err(TrackerError::InvalidConfig(format!(
                "Decay must be in (0, 1): got {}",
                self.decay
            )));
        }

        if self.ref_tempo_bpm <= 0.0 {
            return Err(TrackerError::InvalidConfig(format!(
                "Reference tempo must be > 0 BPM: got {}",
                self.ref_tempo_bpm
            )));
        }

        if self.octave_width <= 0.0 {
            return Err(TrackerError::InvalidConfig(format!(
                "Octave width must be > 0: got {}",
                self.octave_width
            )));
        }

        if self.refractory_divisor == 0 {
            return Err(TrackerError::InvalidConfig(
                "Refractory divisor must be > 0".to_string(),
            ));
        }

        if self.delay_len == 0 {
            return Err(TrackerError::InvalidConfig(
                "Delay line length must be > 0".to_string(),
            ));
        }

        if self.delay_read_offset >= self.delay_len {
            return Err(TrackerError::InvalidConfig(format!(
                "Delay read offset must be < delay length: got {} with length {}",
                self.delay_read_offset, self.delay_len
            )));
        }

        Ok(())
    }
}
