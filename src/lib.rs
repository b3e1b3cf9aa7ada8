//! # swift-build - package build front end
//!
//! `swift-build` turns one command line into one action: build, clean,
//! fetch, init, lock, generate an Xcode project, or print help/version.
//!
//! ## Quick Start
//!
//! ```bash
//! # Create a new executable package
//! swift-build --init
//!
//! # Build in release mode, passing a flag to every C compile
//! swift-build -c release -Xcc -I/opt/include
//! ```
//!
//! ## Module Organization
//!
//! - [`cli`] - Argument normalization, classification and mode resolution
//! - [`commands`] - Mode handlers
//! - [`build`] - Compilation, cleaning and version data
//! - [`deps`] - Dependency cloning
//! - [`toolchain`] - Compiler discovery

/// Build, clean and version-data generation.
pub mod build;

/// Command-line interpretation.
pub mod cli;

/// Handlers for each resolved mode.
pub mod commands;

/// Dependency fetching.
pub mod deps;

/// Lockfile (`PackageVersions.json`) management.
pub mod lock;

/// Package manifest (`Package.toml`) parsing.
pub mod manifest;

/// Package skeletons for `--init`.
pub mod templates;

/// Toolchain detection.
pub mod toolchain;

/// Verbosity levels and logging setup.
pub mod verbosity;

/// Xcode project generation.
pub mod xcodeproj;
