//! Online tempo estimation via running autocorrelation
//!
//! Maintains one exponentially smoothed autocorrelation estimate per lag over
//! the onset stream, weighted by a Gaussian prior on the log-BPM axis so that
//! musically plausible tempi are preferred without hard-limiting the range.
//! The lag with the largest weighted correlation is the current tempo period.
//!
//! # Reference
//!
//! Ellis, D. P. W. (2007). Beat Tracking by Dynamic Programming.
//! *Journal of New Music Research*, 36(1), 51-60.

use crate::ring::RingBuffer;

/// Online autocorrelator with a perceptual tempo prior
///
/// Per update: insert the newest onset value into a circular delay buffer,
/// refresh every lag's running correlation with an exponential moving average,
/// and re-pick the peak of the weighted correlation curve.
#[derive(Debug, Clone)]
pub struct TempoEstimator {
    /// Circular delay buffer of the last `max_lag` onset values
    delays: RingBuffer,

    /// Exponentially smoothed running correlation estimate per lag
    outputs: Vec<f32>,

    /// Session-constant perceptual weight per lag
    weights: Vec<f32>,

    /// Weighted correlation curve from the most recent update, retained for
    /// diagnostic read access
    curve: Vec<f32>,

    /// Smoothing constant, close to 1 for slow forgetting
    decay: f32,
}

impl TempoEstimator {
    /// Create an estimator tracking lags `0..max_lag`
    ///
    /// # Arguments
    ///
    /// * `max_lag` - Largest lag tracked, in frames
    /// * `decay` - Exponential smoothing constant in (0, 1)
    /// * `frame_period` - Frame period in seconds, for the lag-to-BPM mapping
    /// * `ref_tempo_bpm` - Center of the Gaussian tempo prior
    /// * `octave_width` - Standard deviation of the prior, in octaves
    pub fn new(
        max_lag: usize,
        decay: f32,
        frame_period: f32,
        ref_tempo_bpm: f32,
        octave_width: f32,
    ) -> Self {
        let weights = perceptual_weights(max_lag, frame_period, ref_tempo_bpm, octave_width);

        Self {
            delays: RingBuffer::new(max_lag),
            outputs: vec![0.0; max_lag],
            weights,
            curve: vec![0.0; max_lag],
            decay,
        }
    }

    /// Consume one onset value and return the current tempo period in frames
    ///
    /// Reports 0 until some lag's weighted correlation rises above zero, i.e.
    /// before any periodicity has been observed. The peak pick scans lags left
    /// to right with strict `>` replacement, so the smallest (fastest) lag
    /// wins an exact tie.
    pub fn update(&mut self, onset: f32) -> usize {
        self.delays.write(onset);

        let gain = 1.0 - self.decay;
        for (lag, output) in self.outputs.iter_mut().enumerate() {
            *output += gain * (onset * self.delays.past(lag) - *output);
        }

        self.delays.advance();

        let mut best = 0.0f32;
        let mut period = 0;
        for (lag, (&output, &weight)) in self.outputs.iter().zip(&self.weights).enumerate() {
            // Smoothed estimates can dip fractionally below zero from
            // floating-point noise; clamp before the square root
            let value = weight * output.max(0.0).sqrt();
            self.curve[lag] = value;
            if value > best {
                best = value;
                period = lag;
            }
        }

        period
    }

    /// Weighted correlation curve from the most recent update, indexed by lag
    pub fn correlation_curve(&self) -> &[f32] {
        &self.curve
    }
}

/// Gaussian weighting over the log-BPM axis, one weight per lag
///
/// `bpm(lag) = 60 / (frame_period * lag)`; lag 0 maps to an unbounded tempo
/// and gets weight 0 so it can never be picked as the period.
fn perceptual_weights(
    max_lag: usize,
    frame_period: f32,
    ref_tempo_bpm: f32,
    octave_width: f32,
) -> Vec<f32> {
    (0..max_lag)
        .map(|lag| {
            if lag == 0 {
                return 0.0;
            }
            let bpm = 60.0 / (frame_period * lag as f32);
            let octaves = (bpm / ref_tempo_bpm).log2() / octave_width;
            (-0.5 * octaves * octaves).exp()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Estimator with a 0.1 s frame period: lag 20 is exactly 30 BPM
    fn make_estimator() -> TempoEstimator {
        TempoEstimator::new(100, 0.997, 0.1, 120.0, 2.0)
    }

    #[test]
    fn test_weights_peak_at_reference_tempo() {
        // 25 ms frame period puts lag 20 at exactly 120 BPM
        let weights = perceptual_weights(100, 0.025, 120.0, 2.0);
        assert_eq!(weights[0], 0.0);
        assert!((weights[20] - 1.0).abs() < 1e-6);
        assert!(weights[20] > weights[10]);
        assert!(weights[20] > weights[40]);
    }

    #[test]
    fn test_silence_reports_zero_period() {
        let mut estimator = make_estimator();
        for _ in 0..500 {
            assert_eq!(estimator.update(0.0), 0);
        }
        assert!(estimator.correlation_curve().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_periodic_impulses_converge_to_period() {
        let mut estimator = make_estimator();
        let mut period = 0;
        // Well past the 5 / (1 - decay) convergence horizon
        for frame in 0..2000 {
            let onset = if frame % 20 == 0 { 1.0 } else { 0.0 };
            period = estimator.update(onset);
        }
        assert_eq!(period, 20, "impulse train with period 20 should dominate");

        // The curve peak sits at the same lag
        let curve = estimator.correlation_curve();
        let peak = curve
            .iter()
            .enumerate()
            .fold((0, 0.0f32), |acc, (i, &v)| if v > acc.1 { (i, v) } else { acc });
        assert_eq!(peak.0, 20);
    }

    #[test]
    fn test_negative_noise_clamped_before_sqrt() {
        let mut estimator = make_estimator();
        // Alternating-sign onsets drive raw correlations negative at odd lags;
        // a clamped (zero) lag must never win the peak pick
        for frame in 0..1000 {
            let onset = if frame % 2 == 0 { 1.0 } else { -1.0 };
            let period = estimator.update(onset);
            assert_eq!(period % 2, 0, "odd lags have negative correlation");
        }
        assert!(estimator.correlation_curve().iter().all(|v| v.is_finite()));
    }
}
