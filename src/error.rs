//! Error types for the sampling pipeline.
//!
//! One enum per subsystem: [`RunnerError`] for launching and waiting on the
//! external command, [`ParseError`] for extracting samples from a run's
//! output tail, and [`StatsError`] for aggregate math over the collections.

use std::time::Duration;

use thiserror::Error;

use crate::parser::SampleKind;

/// Errors raised while launching and waiting on the external command.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// The shell process could not be started. Aborts the whole run: every
    /// iteration would fail the same way.
    #[error("failed to launch `{command}`: {source}")]
    Launch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The bounded wait expired before the child exited.
    #[error("command did not finish within {limit:?}")]
    Timeout { limit: Duration },

    /// An interrupt arrived while waiting on the child.
    #[error("run interrupted")]
    Interrupted,

    /// Setting up or draining the output pipe failed.
    #[error("failed to capture command output: {0}")]
    Capture(#[from] std::io::Error),
}

/// Errors raised while extracting the two samples from one run's output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The run printed fewer lines than the tail parse needs.
    #[error("run output has {actual} line(s), need at least {required}")]
    InsufficientOutput { required: usize, actual: usize },

    /// The line that should carry the label was blank.
    #[error("expected `{expected}` line, found a blank line")]
    BlankLine { expected: &'static str },

    /// The line's first token is not the expected label.
    #[error("expected label `{expected}`, line starts with `{found}`")]
    LabelMismatch {
        expected: &'static str,
        found: String,
        /// Every whitespace-split token of the offending line.
        tokens: Vec<String>,
    },

    /// The label was present but nothing followed it.
    #[error("`{label}` line has no value token")]
    MissingValue { label: &'static str },

    /// The value token contains no parseable number once filtered down to
    /// digits and dots.
    #[error("token `{token}` is not a number (filtered: `{filtered}`)")]
    MalformedNumber { token: String, filtered: String },
}

/// Errors raised by aggregate computations over sample collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StatsError {
    /// A mean was requested over an empty collection.
    #[error("cannot compute a mean over the empty {kind} collection")]
    EmptyCollection { kind: SampleKind },
}
