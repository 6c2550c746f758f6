//! Onset strength from successive spectral frames
//!
//! Computes a per-frame onset strength scalar as the sum of per-band dB level
//! increases since the previous frame. Rising broadband energy ("attacks")
//! produces positive values; steady or decaying signal produces values near
//! zero or below.
//!
//! # Reference
//!
//! Bello, J. P., Daudet, L., Abdallah, S., Duxbury, C., Davies, M., & Sandler, M. B. (2005).
//! A Tutorial on Onset Detection in Music Signals.
//! *IEEE Transactions on Speech and Audio Processing*, 13(5), 1035-1047.

/// Onset strength detector over log-frequency band magnitudes
///
/// Owns the previous frame's dB levels; each call to [`compute`](Self::compute)
/// overwrites them with the current frame's levels.
#[derive(Debug, Clone)]
pub struct OnsetDetector {
    /// dB level of each band in the previous frame
    prev_levels: Vec<f32>,

    /// Floor for the dB conversion; also the silence value the previous
    /// levels start at
    floor_db: f32,

    /// Scale applied to the raw sum of increments
    scale: f32,
}

impl OnsetDetector {
    /// Create a detector for `n_bands` bands
    ///
    /// Previous levels are initialized to the floor, so the first frame of a
    /// non-silent signal registers as one large attack.
    pub fn new(n_bands: usize, floor_db: f32, scale: f32) -> Self {
        Self {
            prev_levels: vec![floor_db; n_bands],
            floor_db,
            scale,
        }
    }

    /// Compute the onset strength of the current frame
    ///
    /// For each band: `level = max(floor_db, 20 * log10(magnitude))`, summed
    /// increment versus the stored previous level. Zero magnitude hits the
    /// floor instead of producing `-inf`; a NaN from a (contractually
    /// impossible) negative magnitude is absorbed by the floor as well, so the
    /// result is finite for every frame of non-negative magnitudes.
    ///
    /// # Arguments
    ///
    /// * `frame` - One magnitude per band; length must equal the configured
    ///   band count (checked by the orchestrator before this is called)
    pub fn compute(&mut self, frame: &[f32]) -> f32 {
        debug_assert_eq!(frame.len(), self.prev_levels.len());

        let mut sum = 0.0;
        for (prev, &magnitude) in self.prev_levels.iter_mut().zip(frame) {
            // f32::max returns the floor when the log is NaN or -inf
            let level = (20.0 * magnitude.log10()).max(self.floor_db);
            sum += level - *prev;
            *prev = level;
        }

        sum * self.scale
    }
}
