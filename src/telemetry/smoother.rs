//! Moving average over the most recent humidity samples.

use heapless::Deque;

use crate::config::MAX_SMOOTHING_WINDOW;

/// Fixed-capacity ring of the last `capacity` samples.
///
/// Once full, each new value replaces the oldest.  The average is NaN while
/// the window is empty.
#[derive(Debug, Clone)]
pub struct SampleSmoother {
    ring: Deque<f32, MAX_SMOOTHING_WINDOW>,
    capacity: usize,
}

impl SampleSmoother {
    /// `capacity` is clamped to `1..=MAX_SMOOTHING_WINDOW`.
    pub fn new(capacity: usize) -> Self {
        Self {
            ring: Deque::new(),
            capacity: capacity.clamp(1, MAX_SMOOTHING_WINDOW),
        }
    }

    pub fn add_value(&mut self, value: f32) {
        if self.ring.len() >= self.capacity {
            self.ring.pop_front();
        }
        // Cannot fail: len < capacity <= MAX_SMOOTHING_WINDOW here.
        let _ = self.ring.push_back(value);
    }

    pub fn average(&self) -> f32 {
        if self.ring.is_empty() {
            return f32::NAN;
        }
        let sum: f32 = self.ring.iter().sum();
        sum / self.ring.len() as f32
    }

    pub fn clear(&mut self) {
        self.ring.clear();
    }

    pub fn len(&self) -> usize {
        self.ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
