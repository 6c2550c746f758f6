//! Fixed-capacity ring buffer for rolling per-frame state
//!
//! All rolling state in the engine (onset history, score function, beat flags,
//! autocorrelation delay line) lives in buffers of this type: capacity fixed at
//! session start, one write cursor, wrap-on-advance, no per-frame allocation.

/// Fixed-capacity circular buffer of `f32` values with an explicit write cursor
#[derive(Debug, Clone)]
pub struct RingBuffer {
    data: Vec<f32>,
    cursor: usize,
}

impl RingBuffer {
    /// Create a zero-filled ring of the given capacity
    ///
    /// Capacity must be > 0; enforced by config validation before any ring
    /// is constructed.
    pub fn new(capacity: usize) -> Self {
        debug_assert!(capacity > 0, "ring capacity must be > 0");
        Self {
            data: vec![0.0; capacity],
            cursor: 0,
        }
    }

    /// Buffer capacity (never changes)
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Current write position
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Overwrite the slot at the write cursor (does not advance)
    pub fn write(&mut self, value: f32) {
        self.data[self.cursor] = value;
    }

    /// Value at the write cursor
    pub fn current(&self) -> f32 {
        self.data[self.cursor]
    }

    /// Value `lag` slots behind the write cursor, wrapping around
    pub fn past(&self, lag: usize) -> f32 {
        let cap = self.data.len();
        self.data[(self.cursor + cap - lag % cap) % cap]
    }

    /// Advance the write cursor by one slot, wrapping at capacity
    pub fn advance(&mut self) {
        self.cursor = (self.cursor + 1) % self.data.len();
    }

    /// Minimum value over the whole buffer
    pub fn min(&self) -> f32 {
        self.data.iter().copied().fold(f32::INFINITY, f32::min)
    }

    /// Subtract `offset` from every slot
    pub fn subtract_all(&mut self, offset: f32) {
        for v in &mut self.data {
            *v -= offset;
        }
    }

    /// Index of the maximum value, scanning left to right with strict `>`
    /// replacement: the first slot wins exact ties.
    pub fn argmax(&self) -> usize {
        let mut best = self.data[0];
        let mut best_idx = 0;
        for (i, &v) in self.data.iter().enumerate().skip(1) {
            if v > best {
                best = v;
                best_idx = i;
            }
        }
        best_idx
    }

    /// Read-only view of the underlying storage, in physical (not temporal) order
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_advance_wraps() {
        let mut ring = RingBuffer::new(3);
        for i in 0..5 {
            ring.write(i as f32);
            ring.advance();
        }
        // Slots hold 3.0, 4.0, 2.0 after five writes; cursor back at 2
        assert_eq!(ring.as_slice(), &[3.0, 4.0, 2.0]);
        assert_eq!(ring.cursor(), 2);
    }

    #[test]
    fn test_past_indexes_backwards() {
        let mut ring = RingBuffer::new(4);
        for i in 0..4 {
            ring.write(i as f32);
            ring.advance();
        }
        // Cursor wrapped to 0; one slot back is the newest value
        assert_eq!(ring.past(1), 3.0);
        assert_eq!(ring.past(4), ring.current());
    }

    #[test]
    fn test_min_and_subtract() {
        let mut ring = RingBuffer::new(3);
        for v in [2.0, 5.0, 3.0] {
            ring.write(v);
            ring.advance();
        }
        assert_eq!(ring.min(), 2.0);
        ring.subtract_all(2.0);
        assert_eq!(ring.min(), 0.0);
        assert_eq!(ring.as_slice(), &[0.0, 3.0, 1.0]);
    }

    #[test]
    fn test_argmax_first_wins_ties() {
        let mut ring = RingBuffer::new(4);
        for v in [1.0, 7.0, 7.0, 0.0] {
            ring.write(v);
            ring.advance();
        }
        assert_eq!(ring.argmax(), 1);
    }

    #[test]
    fn test_argmax_all_equal() {
        let ring = RingBuffer::new(5);
        assert_eq!(ring.argmax(), 0);
    }
}
