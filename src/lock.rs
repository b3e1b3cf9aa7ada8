//! Lockfile (`PackageVersions.json`) management.
//!
//! The lockfile records, for every clone under `Packages/`, where it came
//! from and what is checked out:
//!
//! ```json
//! { "packages": [ { "clone": "Packages/Foo-1.0.0", "origin": "...", "ref": "1.0.0", "sha": "..." } ] }
//! ```

use anyhow::{Context, Result};
use colored::*;
use git2::Repository;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const LOCKFILE_NAME: &str = "PackageVersions.json";
pub const PACKAGES_DIR: &str = "Packages";

#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct LockFile {
    pub packages: Vec<PackageLock>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PackageLock {
    pub clone: String,
    pub origin: String,
    #[serde(rename = "ref")]
    pub reference: String,
    pub sha: String,
}

#[derive(Debug, Error)]
pub enum LockfileError {
    #[error("{0} is not a git repository")]
    NoGitRepo(String),

    #[error("Packages directory exists but PackageVersions.json does not; run with --lock first")]
    NoLockfile,
}

impl LockFile {
    /// Collects an entry for every repository directly under `root/Packages`.
    pub fn from_packages(root: &Path) -> Result<Self> {
        let packages_dir = root.join(PACKAGES_DIR);
        if !packages_dir.is_dir() {
            return Ok(Self::default());
        }

        let mut dirs: Vec<_> = walkdir::WalkDir::new(&packages_dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_dir())
            .filter(|e| !e.file_name().to_string_lossy().starts_with('.'))
            .map(|e| e.into_path())
            .collect();
        dirs.sort();

        let mut packages = Vec::new();
        for dir in dirs {
            let clone = dir
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            let repo =
                Repository::open(&dir).map_err(|_| LockfileError::NoGitRepo(clone.clone()))?;
            match package_lock(&clone, &repo) {
                Some(entry) => packages.push(entry),
                None => println!(
                    "{} Skipping {}/{}: no 'origin' remote",
                    "!".yellow(),
                    PACKAGES_DIR,
                    clone
                ),
            }
        }
        Ok(Self { packages })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)? + "\n")
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = root.join(LOCKFILE_NAME);
        fs::write(&path, self.to_json()?)
            .with_context(|| format!("Failed to write {}", path.display()))
    }
}

pub fn exists(root: &Path) -> bool {
    root.join(LOCKFILE_NAME).is_file()
}

/// A build must not silently proceed with clones the lockfile does not know.
pub fn check(root: &Path) -> Result<(), LockfileError> {
    if root.join(PACKAGES_DIR).exists() && !exists(root) {
        return Err(LockfileError::NoLockfile);
    }
    Ok(())
}

/// Regenerates `root/PackageVersions.json` from the clones on disk.
pub fn generate(root: &Path) -> Result<LockFile> {
    let lock = LockFile::from_packages(root)?;
    lock.save(root)?;
    tracing::info!(packages = lock.packages.len(), "wrote {}", LOCKFILE_NAME);
    Ok(lock)
}

fn package_lock(clone: &str, repo: &Repository) -> Option<PackageLock> {
    let origin = repo.find_remote("origin").ok()?.url()?.to_string();
    let (reference, sha) = head_ref_and_sha(repo);
    Some(PackageLock {
        clone: format!("{}/{}", PACKAGES_DIR, clone),
        origin,
        reference,
        sha,
    })
}

/// The tag at HEAD (else the branch name) and the HEAD commit id.
fn head_ref_and_sha(repo: &Repository) -> (String, String) {
    let Ok(head) = repo.head() else {
        return (String::new(), String::new());
    };
    let Ok(commit) = head.peel_to_commit() else {
        return (String::new(), String::new());
    };
    let sha = commit.id().to_string();

    let tag = repo.tag_names(None).ok().and_then(|names| {
        names
            .iter()
            .flatten()
            .find(|name| {
                repo.revparse_single(&format!("refs/tags/{}", name))
                    .and_then(|obj| obj.peel_to_commit())
                    .is_ok_and(|c| c.id() == commit.id())
            })
            .map(str::to_string)
    });

    let reference = tag
        .or_else(|| head.is_branch().then(|| head.shorthand().map(str::to_string)).flatten())
        .unwrap_or_default();
    (reference, sha)
}
