//! Aggregation and reporting: sample collections, run tallies and the final
//! report in text or JSON form.

pub mod samples;
pub mod summary;

pub use samples::{IterationTally, SampleSet};
pub use summary::{RunSummary, SampleSummary};
