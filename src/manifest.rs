//! Package manifest (`Package.toml`) parsing and project root discovery.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const MANIFEST_FILE: &str = "Package.toml";

#[derive(Deserialize, Debug, Default, Clone)]
pub struct Manifest {
    #[serde(default)]
    pub package: PackageConfig,
    #[serde(default)]
    pub dependencies: BTreeMap<String, Dependency>,
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct PackageConfig {
    pub name: Option<String>,
    pub version: Option<String>,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub url: String,
    /// Semver requirement matched against the repository's tags.
    pub version: Option<String>,
}

impl Manifest {
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(MANIFEST_FILE);
        if !path.exists() {
            return Err(anyhow::anyhow!(
                "{} not found in {}.\n\n\
                Tip: Run 'swift-build --init' to create one.",
                MANIFEST_FILE,
                root.display()
            ));
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }
}

/// A package on disk: the root package or a fetched dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub name: String,
    pub path: PathBuf,
    pub url: String,
    pub version: Option<semver::Version>,
}

impl Package {
    /// The root package described by `root/Package.toml`.
    pub fn root(root: &Path, manifest: &Manifest) -> Result<Self> {
        let name = manifest
            .package
            .name
            .clone()
            .or_else(|| root.file_name().map(|n| n.to_string_lossy().to_string()))
            .context("Cannot derive a package name from the project root")?;
        let version = manifest
            .package
            .version
            .as_deref()
            .map(semver::Version::parse)
            .transpose()
            .with_context(|| format!("Invalid version in {}", MANIFEST_FILE))?;
        Ok(Self {
            name,
            path: root.to_path_buf(),
            url: root.to_string_lossy().to_string(),
            version,
        })
    }
}

/// Walks up from `start` to the first directory containing `Package.toml`.
pub fn find_root(start: &Path) -> Result<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(MANIFEST_FILE).is_file())
        .map(Path::to_path_buf)
        .with_context(|| {
            format!(
                "No {} found in {} or any parent directory",
                MANIFEST_FILE,
                start.display()
            )
        })
}

/// Project root resolved from the current working directory.
pub fn project_root() -> Result<PathBuf> {
    find_root(&std::env::current_dir()?)
}
