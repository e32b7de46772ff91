//! Fixed-size moving average over integer samples

use std::collections::VecDeque;

/// Errors from [`SampleWindow`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum WindowError {
    #[error("window size must be at least 1")]
    InvalidSize,
    #[error("average requested from an empty window")]
    Empty,
}

/// Running mean of the most recent `window_size` samples.
///
/// The sum is kept alongside the queue so both [`sample`](Self::sample) and
/// [`average`](Self::average) are O(1). The queue is allocated once with room
/// for `window_size + 1` entries, so sampling never reallocates.
#[derive(Debug, Clone)]
pub struct SampleWindow {
    samples: VecDeque<i64>,
    sum: i128,
    window_size: usize,
}

impl SampleWindow {
    /// Create an empty window holding at most `window_size` samples.
    pub fn new(window_size: usize) -> Result<Self, WindowError> {
        if window_size == 0 {
            return Err(WindowError::InvalidSize);
        }
        Ok(Self {
            samples: VecDeque::with_capacity(window_size + 1),
            sum: 0,
            window_size,
        })
    }

    /// Add a sample, evicting the oldest once the window is full.
    pub fn sample(&mut self, value: i64) {
        self.samples.push_back(value);
        self.sum += i128::from(value);
        while self.samples.len() > self.window_size {
            if let Some(oldest) = self.samples.pop_front() {
                self.sum -= i128::from(oldest);
            }
        }
    }

    /// Mean of the queued samples, truncated toward zero.
    pub fn average(&self) -> Result<i64, WindowError> {
        if self.samples.is_empty() {
            return Err(WindowError::Empty);
        }
        // The mean of i64 values always fits back into an i64
        Ok((self.sum / self.samples.len() as i128) as i64)
    }

    /// Samples currently queued
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Drop every sample; the allocation is kept.
    pub fn clear(&mut self) {
        self.samples.clear();
        self.sum = 0;
    }
}
