//! Trigger delay line
//!
//! Time-shifts the beat decision by a fixed number of frames so the audible
//! or visual indicator driven by the caller lands in sync with the playback
//! path's output latency.

/// Fixed-length FIFO delay line for beat triggers
#[derive(Debug, Clone)]
pub struct BeatScheduler {
    slots: Vec<u8>,
    read_offset: usize,
}

impl BeatScheduler {
    /// Create a delay line of `delay_len` slots read at `read_offset`
    ///
    /// `read_offset < delay_len` is enforced by config validation.
    pub fn new(delay_len: usize, read_offset: usize) -> Self {
        debug_assert!(read_offset < delay_len);
        Self {
            slots: vec![0; delay_len],
            read_offset,
        }
    }

    /// Push this frame's trigger and report whether a delayed trigger fires now
    ///
    /// Shifts every slot down by one, inserts the trigger at slot 0 and reads
    /// the slot at the fixed offset. Purely mechanical.
    pub fn push(&mut self, trigger: bool) -> bool {
        for i in (1..self.slots.len()).rev() {
            self.slots[i] = self.slots[i - 1];
        }
        self.slots[0] = trigger as u8;
        self.slots[self.read_offset] == 1
    }
}
