//! Loop control: drives the runner and parser for the configured iteration
//! count and accumulates samples into the two collections.
//!
//! The loop is deliberately forgiving. A timeout, a short output or a bad
//! tail line costs that iteration (or that single sample) and nothing else;
//! only launch and capture failures abort the run, since they would repeat
//! identically on every remaining iteration.

pub mod config;

pub use config::{SamplerConfig, DEFAULT_ITERATIONS};

use std::path::Path;
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::error::{ParseError, RunnerError};
use crate::interrupt::Interrupt;
use crate::parser::{self, SampleKind};
use crate::report::{IterationTally, RunSummary, SampleSet, SampleSummary};
use crate::runner::{CommandRunner, RunOutput};

/// Drives the sampling loop described by a [`SamplerConfig`].
pub struct Sampler {
    config: SamplerConfig,
    interrupt: Interrupt,
}

impl Sampler {
    /// Creates a sampler with a fresh interrupt handle.
    pub fn new(config: SamplerConfig) -> Self {
        Self {
            config,
            interrupt: Interrupt::new(),
        }
    }

    /// Handle that can stop this sampler's run early.
    pub fn interrupt_handle(&self) -> Interrupt {
        self.interrupt.clone()
    }

    /// Runs the full sampling loop and returns the summary.
    ///
    /// Per-iteration conditions (timeouts, short output, label mismatches,
    /// malformed values, non-zero exits) are logged, tallied and skipped.
    /// An interrupt ends the loop at the next boundary and the summary still
    /// reports everything collected up to that point.
    pub async fn run(&self) -> Result<RunSummary, RunnerError> {
        let runner = CommandRunner::new(self.config.runner.clone());
        let started_at = Utc::now();
        let started = Instant::now();

        let mut allocate = SampleSet::new(SampleKind::Allocate);
        let mut deallocate = SampleSet::new(SampleKind::Deallocate);
        let mut tally = IterationTally::default();
        let mut interrupted = false;

        info!(
            command = %self.config.runner.command,
            iterations = self.config.iterations,
            "starting sampling run"
        );

        for iteration in 0..self.config.iterations {
            if self.interrupt.is_set() {
                interrupted = true;
                break;
            }
            if self.config.progress_markers {
                println!("times{iteration}");
            }

            tally.runs += 1;
            let output = match runner.run_once(&self.interrupt).await {
                Ok(output) => output,
                Err(RunnerError::Timeout { limit }) => {
                    warn!(iteration, ?limit, "invocation timed out, iteration skipped");
                    tally.timeouts += 1;
                    continue;
                }
                Err(RunnerError::Interrupted) => {
                    interrupted = true;
                    break;
                }
                Err(fatal) => return Err(fatal),
            };

            if !output.status().success() {
                warn!(iteration, status = %output.status(), "command exited non-zero");
                tally.nonzero_exits += 1;
            }

            match parser::parse_output(output.raw()) {
                Ok(tail) => {
                    let alloc_ok = record_sample(iteration, tail.allocate, &mut allocate, &mut tally);
                    let dealloc_ok =
                        record_sample(iteration, tail.deallocate, &mut deallocate, &mut tally);
                    if !alloc_ok || !dealloc_ok {
                        self.dump_failure(iteration, &output);
                    }
                }
                Err(error) => {
                    warn!(iteration, %error, "run output unparseable, iteration skipped");
                    tally.insufficient_output += 1;
                    self.dump_failure(iteration, &output);
                }
            }
        }

        let finished_at = Utc::now();
        let summary = RunSummary {
            command: self.config.runner.command.clone(),
            iterations_requested: self.config.iterations,
            iterations_run: tally.runs,
            interrupted,
            started_at,
            finished_at,
            elapsed_secs: started.elapsed().as_secs_f64(),
            tally,
            allocate: SampleSummary::from_set(&allocate),
            deallocate: SampleSummary::from_set(&deallocate),
        };

        info!(
            iterations_run = summary.iterations_run,
            allocate_samples = summary.allocate.count,
            deallocate_samples = summary.deallocate.count,
            interrupted = summary.interrupted,
            "sampling run finished"
        );

        Ok(summary)
    }

    /// Dumps the full raw output of a failed iteration, when configured.
    fn dump_failure(&self, iteration: usize, output: &RunOutput) {
        let Some(dir) = &self.config.failure_dir else {
            return;
        };
        match write_dump(dir, iteration, output.raw()) {
            Ok(path) => debug!(iteration, path = %path.display(), "dumped run output"),
            Err(error) => warn!(iteration, %error, "failed to dump run output"),
        }
    }
}

/// Appends a parsed sample to its collection, or logs and tallies the error.
/// Returns whether the sample was recorded.
fn record_sample(
    iteration: usize,
    parsed: Result<f64, ParseError>,
    set: &mut SampleSet,
    tally: &mut IterationTally,
) -> bool {
    let error = match parsed {
        Ok(value) => {
            debug!(iteration, kind = %set.kind(), value, "sample collected");
            set.push(value);
            return true;
        }
        Err(error) => error,
    };

    match &error {
        ParseError::LabelMismatch { tokens, .. } => {
            warn!(iteration, kind = %set.kind(), ?tokens, %error, "sample skipped");
            tally.label_mismatches += 1;
        }
        ParseError::BlankLine { .. } => {
            warn!(iteration, kind = %set.kind(), %error, "sample skipped");
            tally.label_mismatches += 1;
        }
        ParseError::MissingValue { .. } | ParseError::MalformedNumber { .. } => {
            warn!(iteration, kind = %set.kind(), %error, "sample skipped");
            tally.malformed_numbers += 1;
        }
        ParseError::InsufficientOutput { .. } => {
            warn!(iteration, kind = %set.kind(), %error, "sample skipped");
            tally.insufficient_output += 1;
        }
    }
    false
}

/// Writes one iteration's raw output under `dir`, creating it if needed.
fn write_dump(dir: &Path, iteration: usize, raw: &str) -> std::io::Result<std::path::PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("run-{iteration}.log"));
    std::fs::write(&path, raw)?;
    Ok(path)
}
