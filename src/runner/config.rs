//! Configuration for the external command invocation.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Shell used to interpret the command string when none is configured.
pub const DEFAULT_SHELL: &str = "sh";

/// How to invoke the external command. Shared by every iteration of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Command string, run as `<shell> -c <command>`.
    pub command: String,
    /// Shell binary that interprets `command`.
    pub shell: String,
    /// Working directory for the child; current directory when `None`.
    pub working_dir: Option<PathBuf>,
    /// Bound on one invocation's wait; `None` waits forever.
    pub timeout: Option<Duration>,
}

impl RunnerConfig {
    /// Creates a config with the default shell, inherited working directory
    /// and an unbounded wait.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            shell: DEFAULT_SHELL.to_string(),
            working_dir: None,
            timeout: None,
        }
    }

    /// Sets the shell binary.
    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = shell.into();
        self
    }

    /// Sets the child's working directory.
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Bounds each invocation's wait.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
