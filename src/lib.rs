//! bench-sampler: repeated-run benchmark sampling harness.
//!
//! Invokes an external shell command a fixed number of times, scrapes the
//! `allocate`/`deallocate` timing lines from the tail of each run's combined
//! output, and reports the collected values with their arithmetic means.

pub mod cli;
pub mod error;
pub mod interrupt;
pub mod parser;
pub mod report;
pub mod runner;
pub mod sampler;

pub use error::{ParseError, RunnerError, StatsError};
