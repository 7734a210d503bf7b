//! Running mean and variance.
//!
//! Welford's update for single samples and Chan's pairwise formula for
//! merging accumulators, so per-chunk statistics gathered on worker threads
//! can be folded together in a fixed order.

use pf_core::{Real, Size};

/// Incremental statistics accumulator.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IncrementalStatistics {
    count: Size,
    mean: Real,
    m2: Real,
}

impl IncrementalStatistics {
    /// Create a new empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a single sample.
    pub fn add(&mut self, x: Real) {
        self.count += 1;
        let delta = x - self.mean;
        self.mean += delta / self.count as Real;
        self.m2 += delta * (x - self.mean);
    }

    /// Fold another accumulator into this one.
    pub fn merge(&mut self, other: &Self) {
        if other.count == 0 {
            return;
        }
        if self.count == 0 {
            *self = *other;
            return;
        }
        let n_a = self.count as Real;
        let n_b = other.count as Real;
        let n = n_a + n_b;
        let delta = other.mean - self.mean;
        self.mean += delta * n_b / n;
        self.m2 += other.m2 + delta * delta * n_a * n_b / n;
        self.count += other.count;
    }

    /// Number of samples.
    pub fn samples(&self) -> Size {
        self.count
    }

    /// Sample mean, `0` when empty.
    pub fn mean(&self) -> Real {
        self.mean
    }

    /// Unbiased sample variance, `0` for fewer than two samples.
    pub fn variance(&self) -> Real {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count as Real - 1.0)
        }
    }

    /// Sample standard deviation.
    pub fn std_dev(&self) -> Real {
        self.variance().sqrt()
    }

    /// Standard error of the mean, `σ / √n`.
    pub fn error_estimate(&self) -> Real {
        if self.count == 0 {
            0.0
        } else {
            (self.variance() / self.count as Real).sqrt()
        }
    }
}

impl Extend<Real> for IncrementalStatistics {
    fn extend<I: IntoIterator<Item = Real>>(&mut self, iter: I) {
        for x in iter {
            self.add(x);
        }
    }
}

impl FromIterator<Real> for IncrementalStatistics {
    fn from_iter<I: IntoIterator<Item = Real>>(iter: I) -> Self {
        let mut stats = Self::new();
        stats.extend(iter);
        stats
    }
}
