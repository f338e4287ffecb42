//! Configuration for a sampling run.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::runner::RunnerConfig;

/// Default number of iterations in a sampling run.
pub const DEFAULT_ITERATIONS: usize = 1000;

/// Configuration for the whole sampling loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// How the external command is invoked each iteration.
    pub runner: RunnerConfig,
    /// Number of iterations to run.
    pub iterations: usize,
    /// Whether to print the per-iteration `times<i>` marker to stdout.
    pub progress_markers: bool,
    /// Directory for full-output dumps of iterations that failed to parse.
    pub failure_dir: Option<PathBuf>,
}

impl SamplerConfig {
    /// Creates a config for `command` with the default iteration count,
    /// progress markers on and no failure dumps.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            runner: RunnerConfig::new(command),
            iterations: DEFAULT_ITERATIONS,
            progress_markers: true,
            failure_dir: None,
        }
    }

    /// Sets the iteration count.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Sets the shell that interprets the command.
    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.runner = self.runner.with_shell(shell);
        self
    }

    /// Sets the child's working directory.
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.runner = self.runner.with_working_dir(dir);
        self
    }

    /// Bounds each invocation's wait.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.runner = self.runner.with_timeout(timeout);
        self
    }

    /// Enables or disables the per-iteration stdout marker.
    pub fn with_progress_markers(mut self, enabled: bool) -> Self {
        self.progress_markers = enabled;
        self
    }

    /// Dumps the full output of unparseable iterations into `dir`.
    pub fn with_failure_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.failure_dir = Some(dir.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sampler_config_defaults() {
        let config = SamplerConfig::new("cargo run --release");
        assert_eq!(config.runner.command, "cargo run --release");
        assert_eq!(config.iterations, DEFAULT_ITERATIONS);
        assert!(config.progress_markers);
        assert!(config.failure_dir.is_none());
        assert!(config.runner.timeout.is_none());
    }

    #[test]
    fn test_sampler_config_builder_threads_runner_fields() {
        let config = SamplerConfig::new("true")
            .with_iterations(5)
            .with_shell("bash")
            .with_timeout(Duration::from_secs(2))
            .with_progress_markers(false)
            .with_failure_dir("/tmp/dumps");
        assert_eq!(config.iterations, 5);
        assert_eq!(config.runner.shell, "bash");
        assert_eq!(config.runner.timeout, Some(Duration::from_secs(2)));
        assert!(!config.progress_markers);
        assert_eq!(config.failure_dir, Some(PathBuf::from("/tmp/dumps")));
    }
}
