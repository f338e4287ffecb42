//! Sample collections and per-run counters.

use serde::{Deserialize, Serialize};

use crate::error::StatsError;
use crate::parser::SampleKind;

/// Ordered collection of samples of one kind, appended in iteration order.
#[derive(Debug, Clone)]
pub struct SampleSet {
    kind: SampleKind,
    values: Vec<f64>,
}

impl SampleSet {
    /// Creates an empty collection for `kind`.
    pub fn new(kind: SampleKind) -> Self {
        Self {
            kind,
            values: Vec::new(),
        }
    }

    /// Which measurement this collection holds.
    pub fn kind(&self) -> SampleKind {
        self.kind
    }

    /// Appends one sample.
    pub fn push(&mut self, value: f64) {
        self.values.push(value);
    }

    /// The collected values, in insertion order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of collected samples.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when nothing has been collected.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Arithmetic mean of the collection.
    ///
    /// An empty collection is [`StatsError::EmptyCollection`], never `0` or
    /// `NaN`.
    pub fn mean(&self) -> Result<f64, StatsError> {
        if self.values.is_empty() {
            return Err(StatsError::EmptyCollection { kind: self.kind });
        }
        Ok(self.values.iter().sum::<f64>() / self.values.len() as f64)
    }
}

/// Counters for the conditions a run absorbs without stopping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IterationTally {
    /// Iterations attempted: a child was spawned for them.
    pub runs: usize,
    /// Children that exited with a non-zero status.
    pub nonzero_exits: usize,
    /// Invocations killed by the configured timeout.
    pub timeouts: usize,
    /// Runs whose output was too short to parse.
    pub insufficient_output: usize,
    /// Label lines that did not start with the expected token.
    pub label_mismatches: usize,
    /// Value tokens with no parseable number.
    pub malformed_numbers: usize,
}

impl IterationTally {
    /// Total samples dropped for per-line reasons.
    pub fn skipped_samples(&self) -> usize {
        self.label_mismatches + self.malformed_numbers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_of_known_values() {
        let mut set = SampleSet::new(SampleKind::Allocate);
        set.push(1.0);
        set.push(2.0);
        set.push(3.0);
        assert_eq!(set.mean(), Ok(2.0));
        assert_eq!(set.len(), 3);
        assert!(!set.is_empty());
    }

    #[test]
    fn test_mean_of_empty_collection_is_error() {
        let set = SampleSet::new(SampleKind::Deallocate);
        assert_eq!(
            set.mean(),
            Err(StatsError::EmptyCollection {
                kind: SampleKind::Deallocate
            })
        );
    }

    #[test]
    fn test_mean_is_order_independent() {
        // Values chosen to be exactly representable so the sums agree.
        let mut forward = SampleSet::new(SampleKind::Allocate);
        let mut backward = SampleSet::new(SampleKind::Allocate);
        for v in [12.5, 4.0, 0.25, 100.0] {
            forward.push(v);
        }
        for v in [100.0, 0.25, 4.0, 12.5] {
            backward.push(v);
        }
        assert_eq!(forward.mean(), backward.mean());
    }

    #[test]
    fn test_values_preserve_insertion_order() {
        let mut set = SampleSet::new(SampleKind::Allocate);
        set.push(3.0);
        set.push(1.0);
        set.push(2.0);
        assert_eq!(set.values(), &[3.0, 1.0, 2.0]);
    }

    #[test]
    fn test_tally_skipped_samples() {
        let tally = IterationTally {
            label_mismatches: 2,
            malformed_numbers: 3,
            ..Default::default()
        };
        assert_eq!(tally.skipped_samples(), 5);
    }
}
