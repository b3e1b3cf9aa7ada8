//! # swift-build CLI Entry Point
//!
//! Resolves the command line into a single mode and dispatches it. Every
//! failure ends up in [`handle_error`], which prints the message (plus usage
//! text for command-line mistakes) and exits non-zero.

use anyhow::{Context, Result};
use colored::*;

use swift_build::cli::{self, CommandLineError, USAGE};
use swift_build::commands::{self, Session};
use swift_build::toolchain;
use swift_build::verbosity::init_logging;

fn main() {
    if let Err(err) = run() {
        handle_error(&err);
    }
}

fn run() -> Result<()> {
    let original_dir = std::env::current_dir().context("Failed to read the working directory")?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (mode, opts) = cli::parse(&args, toolchain::user_toolchain)?;

    let verbosity = opts.verbosity();
    init_logging(verbosity);
    tracing::debug!(?args, "parsed command line");

    if let Some(dir) = &opts.chdir {
        std::env::set_current_dir(dir)
            .with_context(|| format!("Failed to change directory to {}", dir.display()))?;
    }

    let session = Session {
        original_dir,
        verbosity,
    };
    commands::run(mode, &opts, &session)
}

fn handle_error(err: &anyhow::Error) -> ! {
    eprintln!("{} {:#}", "error:".red().bold(), err);

    let is_usage_error = matches!(
        err.downcast_ref::<cli::Error>(),
        Some(cli::Error::CommandLine(_))
    ) || err.downcast_ref::<CommandLineError>().is_some();
    if is_usage_error {
        eprintln!();
        eprint!("{USAGE}");
    }
    std::process::exit(1);
}
