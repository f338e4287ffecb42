//! CLI command definitions and handlers.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use crate::error::ParseError;
use crate::interrupt::Interrupt;
use crate::parser;
use crate::runner::{CommandRunner, RunnerConfig};
use crate::sampler::{Sampler, SamplerConfig};

#[derive(Parser)]
#[command(
    name = "bench-sampler",
    version,
    about = "Repeated-run benchmark sampler: drive a command in a loop and average its timing lines"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the sampling loop and report the collected samples
    Run {
        /// Shell command to benchmark, run as `<shell> -c <command>` each iteration
        command: String,

        /// Number of iterations
        #[arg(short = 'n', long, default_value = "1000")]
        iterations: usize,

        /// Shell that interprets the command
        #[arg(long, env = "BENCH_SAMPLER_SHELL", default_value = "sh")]
        shell: String,

        /// Working directory for the command
        #[arg(long)]
        workdir: Option<PathBuf>,

        /// Per-invocation timeout in seconds (0 disables the limit)
        #[arg(long, default_value = "0")]
        timeout_secs: u64,

        /// Suppress the per-iteration `times<i>` markers
        #[arg(short, long)]
        quiet: bool,

        /// Dump the full output of unparseable iterations into this directory
        #[arg(long)]
        dump_failures: Option<PathBuf>,

        /// Print the summary as JSON instead of the text report
        #[arg(short, long)]
        json: bool,
    },

    /// Invoke the command once and show what the tail parse sees
    Check {
        /// Shell command to probe
        command: String,

        /// Shell that interprets the command
        #[arg(long, env = "BENCH_SAMPLER_SHELL", default_value = "sh")]
        shell: String,

        /// Working directory for the command
        #[arg(long)]
        workdir: Option<PathBuf>,

        /// Timeout in seconds (0 disables the limit)
        #[arg(long, default_value = "0")]
        timeout_secs: u64,

        /// Print the probe result as JSON
        #[arg(short, long)]
        json: bool,
    },
}

/// Parses CLI arguments from the process environment.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Parses the CLI and dispatches to the selected command.
pub async fn run() -> Result<()> {
    run_with_cli(parse_cli()).await
}

/// Dispatches an already-parsed CLI to its handler.
pub async fn run_with_cli(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run {
            command,
            iterations,
            shell,
            workdir,
            timeout_secs,
            quiet,
            dump_failures,
            json,
        } => {
            handle_run(
                command,
                iterations,
                shell,
                workdir,
                timeout_secs,
                quiet,
                dump_failures,
                json,
            )
            .await
        }
        Commands::Check {
            command,
            shell,
            workdir,
            timeout_secs,
            json,
        } => handle_check(command, shell, workdir, timeout_secs, json).await,
    }
}

#[allow(clippy::too_many_arguments)]
async fn handle_run(
    command: String,
    iterations: usize,
    shell: String,
    workdir: Option<PathBuf>,
    timeout_secs: u64,
    quiet: bool,
    dump_failures: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    // JSON mode keeps stdout machine-readable, so markers are off there too.
    let mut config = SamplerConfig::new(command)
        .with_iterations(iterations)
        .with_shell(shell)
        .with_progress_markers(!quiet && !json);
    if let Some(dir) = workdir {
        config = config.with_working_dir(dir);
    }
    if timeout_secs > 0 {
        config = config.with_timeout(Duration::from_secs(timeout_secs));
    }
    if let Some(dir) = dump_failures {
        config = config.with_failure_dir(dir);
    }

    let sampler = Sampler::new(config);
    sampler.interrupt_handle().listen_for_ctrl_c();
    let summary = sampler.run().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", summary.render_text());
    }
    Ok(())
}

/// One-shot probe result for the `check` command.
#[derive(Debug, Clone, Serialize)]
struct ProbeReport {
    command: String,
    exit_code: Option<i32>,
    lines: usize,
    duration_ms: u64,
    allocate: ProbeOutcome,
    deallocate: ProbeOutcome,
}

#[derive(Debug, Clone, Serialize)]
struct ProbeOutcome {
    value: Option<f64>,
    error: Option<String>,
}

impl ProbeOutcome {
    fn from_result(result: &Result<f64, ParseError>) -> Self {
        match result {
            Ok(value) => Self {
                value: Some(*value),
                error: None,
            },
            Err(error) => Self {
                value: None,
                error: Some(error.to_string()),
            },
        }
    }
}

async fn handle_check(
    command: String,
    shell: String,
    workdir: Option<PathBuf>,
    timeout_secs: u64,
    json: bool,
) -> Result<()> {
    let mut config = RunnerConfig::new(command.clone()).with_shell(shell);
    if let Some(dir) = workdir {
        config = config.with_working_dir(dir);
    }
    if timeout_secs > 0 {
        config = config.with_timeout(Duration::from_secs(timeout_secs));
    }

    let interrupt = Interrupt::new();
    interrupt.listen_for_ctrl_c();
    info!(command = %command, "probing command output");

    let output = CommandRunner::new(config).run_once(&interrupt).await?;
    let (allocate, deallocate) = match parser::parse_output(output.raw()) {
        Ok(tail) => (
            ProbeOutcome::from_result(&tail.allocate),
            ProbeOutcome::from_result(&tail.deallocate),
        ),
        Err(error) => {
            let failed = ProbeOutcome {
                value: None,
                error: Some(error.to_string()),
            };
            (failed.clone(), failed)
        }
    };

    let report = ProbeReport {
        command,
        exit_code: output.status().code(),
        lines: output.line_count(),
        duration_ms: output.duration().as_millis() as u64,
        allocate,
        deallocate,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let exit = report
            .exit_code
            .map_or_else(|| "killed by signal".to_string(), |c| c.to_string());
        println!("command    : {}", report.command);
        println!("exit code  : {exit}");
        println!("lines      : {}", report.lines);
        println!("duration   : {}ms", report.duration_ms);
        print_probe("allocate", &report.allocate);
        print_probe("deallocate", &report.deallocate);
    }
    Ok(())
}

fn print_probe(label: &str, outcome: &ProbeOutcome) {
    match (&outcome.value, &outcome.error) {
        (Some(value), _) => println!("{label:<11}: {value}"),
        (_, Some(error)) => println!("{label:<11}: error: {error}"),
        _ => println!("{label:<11}: -"),
    }
}
