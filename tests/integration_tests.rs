//! End-to-end tests for the beat tracking engine

use cadence_dsp::features::score::BeatScoreTracker;
use cadence_dsp::features::tempo::TempoEstimator;
use cadence_dsp::{track_frames, Tracker, TrackerConfig};

const N_BANDS: usize = 16;

fn test_config() -> TrackerConfig {
    TrackerConfig {
        n_bands: N_BANDS,
        ..Default::default()
    }
}

/// Deterministic pseudo-random magnitude frames (linear congruential generator)
fn synthetic_frames(n_frames: usize, seed: u64) -> Vec<Vec<f32>> {
    let mut state = seed;
    let mut next = move || {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        ((state >> 33) as f32) / (u32::MAX as f32)
    };

    (0..n_frames)
        .map(|_| (0..N_BANDS).map(|_| next()).collect())
        .collect()
}

#[test]
fn test_silence_produces_no_beats() {
    // Scenario: 50 frames of all-zero magnitudes
    let frames = vec![vec![0.0f32; N_BANDS]; 50];
    let outputs = track_frames(&frames, test_config()).unwrap();

    for out in &outputs {
        assert_eq!(out.onset, 0.0, "silence must yield zero onset strength");
        assert!(!out.is_beat, "no beat may be declared on silence");
        assert!(!out.trigger, "no trigger may fire on silence");
        assert_eq!(out.tempo_period, 0);
    }
}

#[test]
fn test_impulse_train_locks_tempo_and_phase() {
    // Scenario: unit onset impulse every 20 frames at a 0.1 s frame period
    // (30 BPM), driven through tempo estimation and beat scoring directly
    let frame_period = 0.1;
    let mut tempo = TempoEstimator::new(100, 0.997, frame_period, 120.0, 2.0);
    let mut score = BeatScoreTracker::new(300, 4);

    let mut beat_frames = Vec::new();
    let mut final_period = 0;
    for frame in 0..200usize {
        let onset = if frame % 20 == 0 { 1.0 } else { 0.0 };
        let period = tempo.update(onset);
        if score.step(onset, period, 10.0) {
            beat_frames.push(frame);
        }
        final_period = period;
    }

    // Tempo converges to the impulse period (the perceptual prior does not
    // displace it: lag 20 is the only periodicity present besides multiples)
    assert_eq!(final_period, 20, "tempo should converge to 20 frames");

    // Beats phase-lock to the impulses within the first ~100 frames
    let locked: Vec<_> = beat_frames.iter().copied().filter(|&f| f >= 100).collect();
    assert!(
        locked.len() >= 4,
        "expected beats in the locked region, got {:?}",
        beat_frames
    );
    for &frame in &locked {
        assert_eq!(frame % 20, 0, "beat off the impulse grid: {:?}", beat_frames);
    }

    // Refractory property over the whole run: no two beats closer than
    // period / 4 at the time of the later beat
    for pair in beat_frames.windows(2) {
        assert!(
            pair[1] - pair[0] > 20 / 4,
            "refractory period violated: {:?}",
            beat_frames
        );
    }
}

#[test]
fn test_score_minimum_stays_pinned_through_session() {
    let frames = synthetic_frames(800, 7);
    let mut tracker = Tracker::new(test_config()).unwrap();

    for frame in &frames {
        tracker.process_frame(frame).unwrap();
        let diag = tracker.diagnostics();
        let min = diag.score.iter().copied().fold(f32::INFINITY, f32::min);
        assert!(
            min.abs() < 1e-3,
            "score minimum drifted to {} at frame {}",
            min,
            diag.cursor
        );
    }
}

#[test]
fn test_identical_sessions_are_deterministic() {
    let frames = synthetic_frames(600, 42);

    let a = track_frames(&frames, test_config()).unwrap();
    let b = track_frames(&frames, test_config()).unwrap();

    assert_eq!(a.len(), b.len());
    for (x, y) in a.iter().zip(&b) {
        assert_eq!(x, y, "sessions diverged at frame {}", x.frame_index);
    }
}

#[test]
fn test_trigger_trails_beat_by_read_offset() {
    let config = TrackerConfig {
        n_bands: N_BANDS,
        delay_len: 16,
        delay_read_offset: 5,
        ..Default::default()
    };

    // Strong attacks every 30 frames over near-silence
    let mut frames = vec![vec![1e-4f32; N_BANDS]; 900];
    for (i, frame) in frames.iter_mut().enumerate() {
        if i % 30 == 0 {
            frame.fill(1.0);
        }
    }

    let outputs = track_frames(&frames, config).unwrap();
    let beat_frames: Vec<u64> = outputs
        .iter()
        .filter(|o| o.is_beat)
        .map(|o| o.frame_index)
        .collect();
    let trigger_frames: Vec<u64> = outputs
        .iter()
        .filter(|o| o.trigger)
        .map(|o| o.frame_index)
        .collect();

    assert!(
        !beat_frames.is_empty(),
        "periodic attacks should produce at least one beat"
    );

    // Every beat within the run produces a trigger exactly read_offset later
    for &beat in &beat_frames {
        let expected = beat + 5;
        if expected < outputs.len() as u64 {
            assert!(
                trigger_frames.contains(&expected),
                "beat at {} produced no trigger at {}: beats {:?}, triggers {:?}",
                beat,
                expected,
                beat_frames,
                trigger_frames
            );
        }
    }
    assert_eq!(
        beat_frames.len(),
        trigger_frames.len() + beat_frames.iter().filter(|&&b| b + 5 >= 900).count()
    );
}
