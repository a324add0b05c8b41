//! linkdeps - link a package into every dependent package of a monorepo
//!
//! Usage:
//! - `linkdeps <dir>` links the local package at `<dir>`
//! - `linkdeps --global <pkg>` links the globally registered package `<pkg>`

use anyhow::Context;
use clap::error::ErrorKind;
use clap::Parser;
use colored::Colorize;
use linkdeps::cli::{CliArgs, USAGE};
use linkdeps::orchestrator::{LinkConfig, Orchestrator};
use linkdeps::target::{resolve, TargetSpec};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            eprint!("{}", e);
            eprintln!("{}", USAGE);
            return ExitCode::FAILURE;
        }
    };

    let spec = match args.target_spec() {
        Ok(spec) => spec,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            eprintln!("{}", USAGE);
            return ExitCode::FAILURE;
        }
    };

    init_logging(&args);

    match run(args, spec).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(args: &CliArgs) {
    let filter = if args.verbose {
        EnvFilter::new("linkdeps=debug")
    } else if args.quiet {
        EnvFilter::new("linkdeps=warn")
    } else {
        EnvFilter::new("linkdeps=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Main application logic
async fn run(args: CliArgs, spec: TargetSpec) -> anyhow::Result<ExitCode> {
    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    let target = resolve(&spec, &cwd).await?;

    let orchestrator = Orchestrator::new(LinkConfig::from_cli(&args, &cwd));
    let report = orchestrator.run(&target).await?;

    if report.is_success() {
        return Ok(ExitCode::SUCCESS);
    }

    eprintln!();
    eprintln!("{}", "Failed to link:".red().bold());
    for failure in report.failures() {
        eprintln!(
            "  - {} ({})",
            failure.command.working_dir.display(),
            failure.status
        );
    }
    Ok(ExitCode::FAILURE)
}
