//! Spawns the external command and captures its combined output.
//!
//! stdout and stderr of the child share a single anonymous pipe, so the
//! captured text preserves the child's write order across both streams. That
//! matters for tail parsing: a compiler that chats on stderr after the
//! program's final stdout line would otherwise displace the lines we scrape.

use std::io::{PipeReader, Read};
use std::process::{ExitStatus, Stdio};
use std::time::Instant;

use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::RunnerError;
use crate::interrupt::Interrupt;

use super::{RunOutput, RunnerConfig};

/// Runs the configured command, one invocation at a time.
#[derive(Debug, Clone)]
pub struct CommandRunner {
    config: RunnerConfig,
}

impl CommandRunner {
    /// Creates a runner for the given config.
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    /// The config this runner was built with.
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Launches `<shell> -c <command>` once and waits for it to exit.
    ///
    /// A configured timeout or a triggered `interrupt` kills the child and
    /// reaps it before the error is returned. Spawn failures are
    /// [`RunnerError::Launch`]; pipe failures are [`RunnerError::Capture`].
    pub async fn run_once(&self, interrupt: &Interrupt) -> Result<RunOutput, RunnerError> {
        let started = Instant::now();

        let (reader, writer) = std::io::pipe()?;
        let writer_clone = writer.try_clone()?;

        let mut child = {
            let mut cmd = Command::new(&self.config.shell);
            cmd.arg("-c")
                .arg(&self.config.command)
                .stdin(Stdio::null())
                .stdout(writer)
                .stderr(writer_clone)
                .kill_on_drop(true);
            if let Some(dir) = &self.config.working_dir {
                cmd.current_dir(dir);
            }
            // `cmd` drops at the end of this block, closing the parent's
            // copies of the pipe writers. The reader then sees EOF as soon
            // as the child side closes.
            cmd.spawn().map_err(|source| RunnerError::Launch {
                command: self.config.command.clone(),
                source,
            })?
        };

        let drain = spawn_drain(reader);
        let status = self.wait_for_exit(&mut child, interrupt).await?;

        let bytes = drain
            .await
            .map_err(|e| RunnerError::Capture(std::io::Error::other(e)))??;
        let raw = String::from_utf8_lossy(&bytes).into_owned();

        debug!(
            status = %status,
            bytes = bytes.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "command finished"
        );

        Ok(RunOutput::new(raw, status, started.elapsed()))
    }

    /// Waits for the child, racing the interrupt and the configured timeout.
    async fn wait_for_exit(
        &self,
        child: &mut Child,
        interrupt: &Interrupt,
    ) -> Result<ExitStatus, RunnerError> {
        let wait = async {
            tokio::select! {
                status = child.wait() => status.map_err(RunnerError::Capture),
                _ = interrupt.cancelled() => Err(RunnerError::Interrupted),
            }
        };

        let result = match self.config.timeout {
            Some(limit) => match tokio::time::timeout(limit, wait).await {
                Ok(inner) => inner,
                Err(_) => Err(RunnerError::Timeout { limit }),
            },
            None => wait.await,
        };

        match result {
            Ok(status) => Ok(status),
            Err(error) => {
                kill_and_reap(child).await;
                Err(error)
            }
        }
    }
}

/// Kills the child and waits so no zombie is left behind.
async fn kill_and_reap(child: &mut Child) {
    if let Err(error) = child.start_kill() {
        debug!(%error, "failed to signal child");
    }
    if let Err(error) = child.wait().await {
        debug!(%error, "failed to reap child");
    }
}

/// Drains the read end of the capture pipe on a blocking worker.
///
/// Runs concurrently with the child: a command that fills the pipe buffer
/// must never deadlock against a parent that only reads after exit.
fn spawn_drain(reader: PipeReader) -> JoinHandle<std::io::Result<Vec<u8>>> {
    tokio::task::spawn_blocking(move || {
        let mut reader = reader;
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        Ok(buf)
    })
}
