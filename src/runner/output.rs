//! Captured result of one external command invocation.

use std::process::ExitStatus;
use std::time::Duration;

/// One run's combined output text, exit status and wall-clock duration.
#[derive(Debug, Clone)]
pub struct RunOutput {
    raw: String,
    status: ExitStatus,
    duration: Duration,
}

impl RunOutput {
    pub(crate) fn new(raw: String, status: ExitStatus, duration: Duration) -> Self {
        Self {
            raw,
            status,
            duration,
        }
    }

    /// The merged output text, stdout and stderr interleaved in write order.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Iterates over the output lines.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.raw.lines()
    }

    /// Number of output lines.
    pub fn line_count(&self) -> usize {
        self.raw.lines().count()
    }

    /// The child's exit status.
    pub fn status(&self) -> ExitStatus {
        self.status
    }

    /// Wall-clock time from spawn to reaped exit.
    pub fn duration(&self) -> Duration {
        self.duration
    }
}
