//! Fixed-capacity rolling buffer

use std::collections::VecDeque;

/// Rolling buffer that evicts the oldest sample when full
#[derive(Debug, Clone)]
pub struct RollingBuffer<T> {
    /// Samples, oldest first
    storage: VecDeque<T>,
    capacity: usize,
}

impl<T> RollingBuffer<T> {
    /// Create a new rolling buffer with given capacity (at least 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            storage: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a sample, returning the evicted one if the buffer was full
    pub fn push(&mut self, item: T) -> Option<T> {
        let evicted = if self.storage.len() >= self.capacity {
            self.storage.pop_front()
        } else {
            None
        };
        self.storage.push_back(item);
        evicted
    }

    /// Number of samples currently held
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.storage.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.storage.iter()
    }
}

impl RollingBuffer<f32> {
    /// Arithmetic mean of the held samples, 0.0 when empty
    pub fn mean(&self) -> f32 {
        if self.storage.is_empty() {
            return 0.0;
        }
        self.storage.iter().sum::<f32>() / self.storage.len() as f32
    }
}
