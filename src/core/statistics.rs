//! Rank sample accumulator.

/// Accumulated rank samples of one pipeline.
///
/// Keeps every sample so that merging statistics replays the exact values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankStatistics {
    values: Vec<f64>,
    sum: f64,
}

impl RankStatistics {
    /// Creates an empty accumulator.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            values: Vec::new(),
            sum: 0.0,
        }
    }

    /// Adds one sample.
    pub fn add(&mut self, value: f64) {
        self.values.push(value);
        self.sum += value;
    }

    /// Adds every sample of `other`, in order.
    pub fn merge(&mut self, other: &Self) {
        for &value in &other.values {
            self.add(value);
        }
    }

    /// Number of samples.
    #[must_use]
    pub fn count(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no sample was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Samples in insertion order.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Arithmetic mean, `None` when empty.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean(&self) -> Option<f64> {
        if self.values.is_empty() {
            None
        } else {
            Some(self.sum / self.values.len() as f64)
        }
    }
}

impl FromIterator<f64> for RankStatistics {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut stats = Self::new();
        for value in iter {
            stats.add(value);
        }
        stats
    }
}
