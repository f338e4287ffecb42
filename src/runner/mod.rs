//! Process runner: launches the external command and captures one run's
//! combined stdout and stderr.

pub mod config;
pub mod executor;
pub mod output;

pub use config::{RunnerConfig, DEFAULT_SHELL};
pub use executor::CommandRunner;
pub use output::RunOutput;
