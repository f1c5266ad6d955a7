//! Fixed-capacity sliding window of recent scalar samples.

use smallvec::SmallVec;
use std::collections::VecDeque;

/// Ordered copy of a history, oldest first. Stays on the stack for the
/// window sizes the interpreter uses.
pub type Samples = SmallVec<[f32; 32]>;

/// FIFO window: pushing into a full history evicts the oldest sample.
#[derive(Clone, Debug)]
pub struct SignalHistory {
    samples: VecDeque<f32>,
    capacity: usize,
}

impl SignalHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, sample: f32) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    /// Current samples, oldest first.
    pub fn as_sequence(&self) -> Samples {
        self.samples.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}
