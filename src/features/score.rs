//! Causal dynamic-programming beat decision
//!
//! Maintains a rolling window of onset strengths and an evolving best-score
//! function over that window. Each frame, a DP step picks the best-scoring
//! predecessor beat hypothesis within a tempo-relative search range and
//! decides whether the current frame is a beat. This is the online, no-lookahead
//! counterpart of offline DP beat tracking: each frame's winner is chosen once
//! and past decisions are never revisited.
//!
//! # Reference
//!
//! Ellis, D. P. W. (2007). Beat Tracking by Dynamic Programming.
//! *Journal of New Music Research*, 36(1), 51-60.

use crate::ring::RingBuffer;

/// Rolling beat-tracking table: onset history, score function and beat flags
/// as three parallel circular buffers sharing one write cursor
#[derive(Debug, Clone)]
pub struct BeatScoreTracker {
    /// Onset strength per historical frame
    onsets: RingBuffer,

    /// Best accumulated score per historical frame; minimum pinned at 0
    /// after every step
    score: RingBuffer,

    /// 1.0 where a beat was declared, else 0.0
    beats: RingBuffer,

    /// Frames elapsed since the last declared beat
    frames_since_beat: usize,

    /// Refractory period divisor (beat gap must exceed `period / divisor`)
    refractory_divisor: usize,

    /// Whether the degenerate-tempo fallback has been logged yet
    fallback_logged: bool,
}

impl BeatScoreTracker {
    /// Create a tracker with a rolling window of `window_len` frames
    pub fn new(window_len: usize, refractory_divisor: usize) -> Self {
        Self {
            onsets: RingBuffer::new(window_len),
            score: RingBuffer::new(window_len),
            beats: RingBuffer::new(window_len),
            frames_since_beat: 0,
            refractory_divisor,
            fallback_logged: false,
        }
    }

    /// Run one DP step and decide whether the current frame is a beat
    ///
    /// # Arguments
    ///
    /// * `onset` - Onset strength of the current frame
    /// * `tempo_period` - Current tempo period estimate in frames
    /// * `alpha` - Trade-off weight between onset strength and tempo
    ///   deviation penalty, snapshotted by the caller for this frame
    ///
    /// # Algorithm
    ///
    /// 1. Store the onset at the write cursor.
    /// 2. Score candidate predecessors at lags in
    ///    `[max(period/2, 1), min(window, 2*period))`:
    ///    `onset + score[lag back] - alpha * ln(lag / period)^2`. The scan
    ///    runs left to right with strict `>` replacement, so the smallest
    ///    qualifying lag wins an exact tie. An empty range (degenerate tempo
    ///    estimate) falls back to the bare onset value.
    /// 3. Renormalize the score buffer so its minimum is exactly 0, bounding
    ///    drift of the otherwise non-decaying running sum.
    /// 4. Declare a beat iff the renormalized window's peak sits at the
    ///    current frame, the tempo estimate is non-degenerate, and more than
    ///    `period / refractory_divisor` frames have passed since the last beat.
    /// 5. Advance the shared cursor.
    pub fn step(&mut self, onset: f32, tempo_period: usize, alpha: f32) -> bool {
        self.onsets.write(onset);

        // Candidate predecessor lags from half to double the tempo period.
        // Lag 0 is excluded so the log-ratio penalty stays finite.
        let lo = (tempo_period / 2).max(1);
        let hi = (2 * tempo_period).min(self.score.capacity());

        let mut best: Option<f32> = None;
        for lag in lo..hi {
            let ratio = lag as f32 / tempo_period as f32;
            let penalty = alpha * ratio.ln().powi(2);
            let candidate = onset + self.score.past(lag) - penalty;
            if best.map_or(true, |b| candidate > b) {
                best = Some(candidate);
            }
        }

        let score = match best {
            Some(s) => s,
            None => {
                // Tempo not yet stabilized: the frame is its own best predecessor
                if !self.fallback_logged {
                    log::debug!(
                        "Empty DP search window (tempo period {}), falling back to bare onset",
                        tempo_period
                    );
                    self.fallback_logged = true;
                }
                onset
            }
        };
        self.score.write(score);

        let min = self.score.min();
        self.score.subtract_all(min);

        let peak = self.score.argmax();
        self.frames_since_beat += 1;

        let mut is_beat = false;
        if peak == self.score.cursor()
            && tempo_period > 0
            && self.frames_since_beat > tempo_period / self.refractory_divisor
        {
            is_beat = true;
            self.frames_since_beat = 0;
        }
        self.beats.write(if is_beat { 1.0 } else { 0.0 });

        self.onsets.advance();
        self.score.advance();
        self.beats.advance();

        is_beat
    }

    /// Onset history in physical buffer order
    pub fn onset_history(&self) -> &[f32] {
        self.onsets.as_slice()
    }

    /// Score function in physical buffer order
    pub fn score_function(&self) -> &[f32] {
        self.score.as_slice()
    }

    /// Beat flags (0.0 / 1.0) in physical buffer order
    pub fn beat_flags(&self) -> &[f32] {
        self.beats.as_slice()
    }

    /// Write cursor shared by the three buffers: the slot for the next frame
    pub fn cursor(&self) -> usize {
        self.onsets.cursor()
    }
}
