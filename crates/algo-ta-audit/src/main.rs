//! algo-ta-audit command-line entry point.
//!
//! The Markdown summary goes to stdout, logs to stderr. The process exits
//! with status 1 when any kernel failed.

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use algo_ta_audit::args::{Args, Command};
use algo_ta_audit::report::{write_catalog, write_markdown, write_reports};
use algo_ta_audit::{run, Mode};

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    init_logging();

    let (mode, run_args) = match &args.command {
        Command::List { category } => {
            write_catalog(category.as_deref(), io::stdout().lock())?;
            return Ok(ExitCode::SUCCESS);
        }
        Command::Validate(run_args) => (Mode::Validate, run_args),
        Command::Bench(run_args) => (Mode::Bench, run_args),
        Command::Audit(run_args) => (Mode::Audit, run_args),
    };

    let config = args.resolve_config().context("invalid configuration")?;
    let summary = run(mode, &config).context("audit could not start")?;

    let mut stdout = io::stdout().lock();
    write_markdown(&summary, &mut stdout)?;
    stdout.flush()?;

    if !run_args.no_write {
        let written = write_reports(&summary, &config.output_dir)
            .with_context(|| format!("writing reports to {}", config.output_dir.display()))?;
        info!(files = written.len(), dir = %config.output_dir.display(), "reports written");
    }

    Ok(if summary.passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
