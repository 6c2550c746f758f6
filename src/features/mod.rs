//! Per-frame signal processing components
//!
//! The beat tracking pipeline, in call order:
//! - Onset detection (spectral frame -> onset strength scalar)
//! - Tempo estimation (onset stream -> tempo period in frames)
//! - Beat scoring (onset + tempo period -> beat decision)
//! - Trigger scheduling (beat decision -> latency-compensated trigger)

pub mod onset;
pub mod schedule;
pub mod score;
pub mod tempo;
