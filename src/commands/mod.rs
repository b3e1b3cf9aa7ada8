//! Mode handlers.
//!
//! [`run`] takes the resolved mode and options and calls the collaborator
//! for that mode. Every handler is a single blocking call.

mod build;
mod project;

use crate::build::clean;
use crate::cli::{Mode, Options, print_usage, version_string};
use crate::manifest::project_root;
use crate::verbosity::Verbosity;
use crate::{deps, lock, templates};
use anyhow::Result;
use colored::*;
use std::path::PathBuf;

pub use project::prettied;

/// Process-level facts the handlers need besides the mode itself.
#[derive(Debug, Clone)]
pub struct Session {
    /// Working directory before `--chdir` was applied
    pub original_dir: PathBuf,
    pub verbosity: Verbosity,
}

pub fn run(mode: Mode, opts: &Options, session: &Session) -> Result<()> {
    tracing::debug!(mode = %mode, "dispatching");
    match mode {
        Mode::Build(conf, toolchain) => build::build(conf, &toolchain, opts, session, true),
        Mode::IgnoreLock => {
            let toolchain = crate::toolchain::user_toolchain()?;
            build::build(crate::cli::Configuration::Debug, &toolchain, opts, session, false)
        }
        Mode::Lock => {
            let lock = lock::generate(&project_root()?)?;
            println!(
                "{} Wrote {} ({} packages)",
                "✓".green(),
                lock::LOCKFILE_NAME,
                lock.packages.len()
            );
            Ok(())
        }
        Mode::Fetch => {
            let (_, external) = deps::fetch(&project_root()?)?;
            println!("{} Fetched {} packages", "✓".green(), external.len());
            Ok(())
        }
        Mode::Init(kind) => templates::init_package(&std::env::current_dir()?, kind),
        Mode::Clean(kind) => clean(&project_root()?, kind),
        Mode::GenerateXcodeproj(outpath) => project::generate_xcodeproj(outpath.as_deref(), session),
        Mode::Usage => {
            print_usage();
            Ok(())
        }
        Mode::Version => {
            println!("{}", version_string());
            Ok(())
        }
    }
}
