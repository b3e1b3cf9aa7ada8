//! Build artifact cleanup.
//!
//! - `--clean` / `--clean=build` removes `.build/`
//! - `--clean=dist` removes `Packages/` and then `.build/`

use super::compile::BUILD_DIR;
use crate::cli::CleanMode;
use crate::lock::PACKAGES_DIR;
use anyhow::{Context, Result};
use colored::*;
use std::fs;
use std::path::Path;

pub fn clean(root: &Path, mode: CleanMode) -> Result<()> {
    let mut cleaned = false;

    if mode == CleanMode::Dist {
        cleaned |= remove_dir(&root.join(PACKAGES_DIR))?;
    }
    cleaned |= remove_dir(&root.join(BUILD_DIR))?;

    if cleaned {
        println!("{} Clean complete.", "✓".green());
    } else {
        println!("{} Nothing to clean", "!".yellow());
    }
    Ok(())
}

fn remove_dir(dir: &Path) -> Result<bool> {
    if !dir.exists() {
        return Ok(false);
    }
    fs::remove_dir_all(dir).with_context(|| format!("Failed to remove {}", dir.display()))?;
    tracing::info!(dir = %dir.display(), "removed");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join(BUILD_DIR).join("debug")).unwrap();
        fs::create_dir_all(dir.path().join(PACKAGES_DIR).join("Dep-1.0.0")).unwrap();
        dir
    }

    #[test]
    fn test_clean_build_keeps_packages() {
        let dir = project();
        clean(dir.path(), CleanMode::Build).unwrap();
        assert!(!dir.path().join(BUILD_DIR).exists());
        assert!(dir.path().join(PACKAGES_DIR).exists());
    }

    #[test]
    fn test_clean_dist_removes_both() {
        let dir = project();
        clean(dir.path(), CleanMode::Dist).unwrap();
        assert!(!dir.path().join(BUILD_DIR).exists());
        assert!(!dir.path().join(PACKAGES_DIR).exists());
    }

    #[test]
    fn test_clean_empty_project_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        clean(dir.path(), CleanMode::Dist).unwrap();
    }
}
