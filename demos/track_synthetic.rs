//! Example: track beats in a synthetic kick pattern
//!
//! Stands in for a live audio front end: synthesizes a four-on-the-floor kick
//! pattern, runs a Hamming-windowed FFT per analysis buffer, averages the
//! magnitudes into log-spaced frequency bands, and feeds the band frames to
//! the tracker. Prints each detected beat and the final tempo estimate.
//!
//! Run with `RUST_LOG=debug` to see the engine's internal logging.

use cadence_dsp::{Tracker, TrackerConfig};
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

const SAMPLE_RATE: u32 = 44100;
const BUFFER_SIZE: usize = 512;
const MIN_BANDWIDTH_HZ: f32 = 50.0;
const BINS_PER_OCTAVE: usize = 4;

/// Log-spaced band edges in Hz, from the minimum bandwidth up to Nyquist
fn band_edges() -> Vec<(f32, f32)> {
    let nyquist = SAMPLE_RATE as f32 / 2.0;
    let mut edges = vec![(0.0, MIN_BANDWIDTH_HZ)];

    let mut octave_lo = MIN_BANDWIDTH_HZ;
    while octave_lo < nyquist {
        let octave_hi = (octave_lo * 2.0).min(nyquist);
        let step = (octave_hi - octave_lo) / BINS_PER_OCTAVE as f32;
        for k in 0..BINS_PER_OCTAVE {
            let lo = octave_lo + step * k as f32;
            let hi = lo + step;
            if lo >= nyquist {
                break;
            }
            edges.push((lo, hi.min(nyquist)));
        }
        octave_lo = octave_hi;
    }

    edges
}

/// Average FFT bin magnitudes into the given frequency bands
fn band_magnitudes(spectrum: &[Complex<f32>], edges: &[(f32, f32)]) -> Vec<f32> {
    let bin_hz = SAMPLE_RATE as f32 / BUFFER_SIZE as f32;
    edges
        .iter()
        .map(|&(lo, hi)| {
            let first = (lo / bin_hz) as usize;
            let last = ((hi / bin_hz) as usize).max(first + 1).min(spectrum.len());
            let sum: f32 = spectrum[first..last].iter().map(|c| c.norm()).sum();
            sum / (last - first) as f32
        })
        .collect()
}

/// Four-on-the-floor kick pattern: a decaying 60 Hz burst on every beat
fn synthesize_kicks(bpm: f32, seconds: f32) -> Vec<f32> {
    let n = (seconds * SAMPLE_RATE as f32) as usize;
    let beat_interval = (60.0 / bpm * SAMPLE_RATE as f32) as usize;
    let kick_len = SAMPLE_RATE as usize / 10;

    let mut samples = vec![0.0f32; n];
    let mut pos = 0;
    while pos < n {
        for i in 0..kick_len.min(n - pos) {
            let t = i as f32 / SAMPLE_RATE as f32;
            let envelope = (-t * 40.0).exp();
            samples[pos + i] += 0.8 * envelope * (2.0 * std::f32::consts::PI * 60.0 * t).sin();
        }
        pos += beat_interval;
    }
    samples
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let edges = band_edges();
    let config = TrackerConfig {
        sample_rate: SAMPLE_RATE,
        buffer_size: BUFFER_SIZE,
        n_bands: edges.len(),
        ..Default::default()
    };
    let frame_period = config.frame_period();
    let mut tracker = Tracker::new(config)?;

    let samples = synthesize_kicks(125.0, 20.0);

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(BUFFER_SIZE);

    // Hamming window, matching a typical analyzer front end
    let window: Vec<f32> = (0..BUFFER_SIZE)
        .map(|i| {
            0.54 - 0.46
                * (2.0 * std::f32::consts::PI * i as f32 / (BUFFER_SIZE - 1) as f32).cos()
        })
        .collect();

    println!("Tracking a synthetic 125 BPM kick pattern ({} bands)...", edges.len());

    let mut buffer = vec![Complex::new(0.0f32, 0.0); BUFFER_SIZE];
    for (frame_idx, chunk) in samples.chunks_exact(BUFFER_SIZE).enumerate() {
        for (slot, (&sample, &w)) in buffer.iter_mut().zip(chunk.iter().zip(&window)) {
            *slot = Complex::new(sample * w, 0.0);
        }
        fft.process(&mut buffer);

        let frame = band_magnitudes(&buffer[..BUFFER_SIZE / 2], &edges);
        let out = tracker.process_frame(&frame)?;

        if out.is_beat {
            println!(
                "  beat at {:6.2} s  ({:5.1} BPM estimate)",
                frame_idx as f32 * frame_period,
                out.bpm
            );
        }
    }

    println!("Final estimate: {:.1} BPM", tracker.current_bpm());
    Ok(())
}
