//! Fixed-capacity FIFO window of recent closes.
//!
//! Statistics are recomputed from the buffered values on every call instead
//! of being tracked incrementally, so the result depends only on the values
//! currently in the window and never on how they got there.

use std::collections::VecDeque;

/// Bounded window; pushing into a full window evicts the oldest value.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    values: VecDeque<f64>,
    capacity: usize,
}

impl RollingWindow {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity >= 1, "window capacity must be >= 1");
        Self {
            values: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, value: f64) {
        if self.values.len() == self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.values.len() == self.capacity
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &f64> + '_ {
        self.values.iter()
    }

    pub fn latest(&self) -> Option<f64> {
        self.values.back().copied()
    }

    /// Mean of the whole window. `None` when empty.
    pub fn mean(&self) -> Option<f64> {
        if self.values.is_empty() {
            return None;
        }
        Some(self.values.iter().sum::<f64>() / self.values.len() as f64)
    }

    /// Mean of the `n` most recent values. `None` if fewer than `n` are held or `n == 0`.
    pub fn tail_mean(&self, n: usize) -> Option<f64> {
        if n == 0 || n > self.values.len() {
            return None;
        }
        let sum: f64 = self.values.iter().rev().take(n).sum();
        Some(sum / n as f64)
    }

    /// Population mean and standard deviation (divides by n, not n - 1).
    pub fn mean_and_population_std(&self) -> Option<(f64, f64)> {
        let mean = self.mean()?;
        let n = self.values.len() as f64;
        let variance = self
            .values
            .iter()
            .map(|v| (v - mean) * (v - mean))
            .sum::<f64>()
            / n;
        Some((mean, variance.sqrt()))
    }
}
