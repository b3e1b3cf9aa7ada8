//! Per-package version metadata.
//!
//! Every build writes `.build/versionData/<package>.swift` so programs can
//! report which revision of each dependency they were built from.

use crate::manifest::Package;
use anyhow::{Context, Result};
use git2::{Repository, StatusOptions};
use semver::Version;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

pub fn generate_version_data(build_dir: &Path, root: &Package, external: &[Package]) -> Result<()> {
    let dir = build_dir.join("versionData");
    fs::create_dir_all(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    for pkg in external.iter().chain(std::iter::once(root)) {
        let data = version_data(pkg)?;
        let path = dir.join(format!("{}.swift", pkg.name));
        fs::write(&path, data).with_context(|| format!("Failed to write {}", path.display()))?;
    }
    tracing::debug!(dir = %dir.display(), packages = external.len() + 1, "wrote version data");
    Ok(())
}

/// Repository state that ends up in the version file.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RepoState {
    pub head_sha: String,
    /// Commit the package's version tag points at, if the tag exists
    pub version_sha: Option<String>,
    pub modified: bool,
}

fn version_data(pkg: &Package) -> Result<String> {
    let state = match Repository::open(&pkg.path) {
        Ok(repo) => Some(repo_state(&repo, pkg.version.as_ref())?),
        Err(_) => None,
    };
    Ok(render(pkg, state.as_ref()))
}

fn repo_state(repo: &Repository, version: Option<&Version>) -> Result<RepoState> {
    let head_sha = repo
        .head()
        .ok()
        .and_then(|h| h.peel_to_commit().ok())
        .map(|c| c.id().to_string())
        .unwrap_or_default();

    let version_sha = version.and_then(|v| {
        [format!("v{}", v), v.to_string()].iter().find_map(|tag| {
            repo.revparse_single(&format!("refs/tags/{}", tag))
                .and_then(|obj| obj.peel_to_commit())
                .ok()
                .map(|c| c.id().to_string())
        })
    });

    let mut opts = StatusOptions::new();
    opts.include_untracked(false).include_ignored(false);
    let modified = !repo
        .statuses(Some(&mut opts))
        .context("Failed to read repository status")?
        .is_empty();

    Ok(RepoState {
        head_sha,
        version_sha,
        modified,
    })
}

pub fn render(pkg: &Package, state: Option<&RepoState>) -> String {
    let mut data = String::new();
    let _ = writeln!(data, "public let url: String = \"{}\"", pkg.url);

    data.push_str("public let version: (major: Int, minor: Int, patch: Int, prereleaseIdentifiers: [String], buildMetadata: String?) = ");
    match &pkg.version {
        Some(v) => {
            let pre: Vec<String> = if v.pre.is_empty() {
                Vec::new()
            } else {
                v.pre.as_str().split('.').map(|id| format!("\"{}\"", id)).collect()
            };
            let build = if v.build.is_empty() {
                "nil".to_string()
            } else {
                format!("\"{}\"", v.build)
            };
            let _ = writeln!(
                data,
                "({}, {}, {}, [{}], {})",
                v.major,
                v.minor,
                v.patch,
                pre.join(", "),
                build
            );
            let _ = writeln!(data, "public let versionString: String = \"{}\"", v);
        }
        None => {
            data.push_str("(0, 0, 0, [], nil)\n");
            data.push_str("public let versionString: String = \"0.0.0\"\n");
        }
    }

    data.push_str("public let sha: String? = ");
    match state {
        Some(state) => {
            let at_version_tag = pkg.version.is_some()
                && state.version_sha.as_deref() == Some(state.head_sha.as_str());
            if at_version_tag {
                data.push_str("nil\n");
            } else {
                let _ = writeln!(data, "\"{}\"", state.head_sha);
            }
            let _ = writeln!(data, "public let modified: Bool = {}", state.modified);
        }
        None => {
            data.push_str("nil\n");
            data.push_str("public let modified: Bool = false\n");
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn package(version: Option<Version>) -> Package {
        Package {
            name: "testPkg".to_string(),
            path: PathBuf::from("path"),
            url: "https://github.com/testPkg".to_string(),
            version,
        }
    }

    #[test]
    fn test_versioned_package_without_repo() {
        let data = render(&package(Some(Version::new(1, 2, 3))), None);
        assert_eq!(
            data,
            "public let url: String = \"https://github.com/testPkg\"\n\
             public let version: (major: Int, minor: Int, patch: Int, prereleaseIdentifiers: [String], buildMetadata: String?) = (1, 2, 3, [], nil)\n\
             public let versionString: String = \"1.2.3\"\n\
             public let sha: String? = nil\n\
             public let modified: Bool = false\n"
        );
    }

    #[test]
    fn test_unversioned_package() {
        let data = render(&package(None), None);
        assert!(data.contains("= (0, 0, 0, [], nil)\n"));
        assert!(data.contains("versionString: String = \"0.0.0\""));
    }

    #[test]
    fn test_prerelease_and_build_metadata() {
        let version = Version::parse("2.0.0-beta.1+exp.sha").unwrap();
        let data = render(&package(Some(version)), None);
        assert!(data.contains("(2, 0, 0, [\"beta\", \"1\"], \"exp.sha\")"));
    }

    #[test]
    fn test_sha_omitted_at_version_tag() {
        let state = RepoState {
            head_sha: "abc".to_string(),
            version_sha: Some("abc".to_string()),
            modified: true,
        };
        let data = render(&package(Some(Version::new(1, 0, 0))), Some(&state));
        assert!(data.contains("public let sha: String? = nil\n"));
        assert!(data.contains("public let modified: Bool = true\n"));

        let moved = RepoState {
            version_sha: Some("def".to_string()),
            ..state
        };
        let data = render(&package(Some(Version::new(1, 0, 0))), Some(&moved));
        assert!(data.contains("public let sha: String? = \"abc\"\n"));
    }

    #[test]
    fn test_writes_one_file_per_package() {
        let dir = tempfile::tempdir().unwrap();
        let root = Package {
            name: "root".to_string(),
            path: dir.path().join("root"),
            url: "root".to_string(),
            version: None,
        };
        generate_version_data(dir.path(), &root, &[package(None)]).unwrap();
        assert!(dir.path().join("versionData").join("root.swift").exists());
        assert!(dir.path().join("versionData").join("testPkg.swift").exists());
    }
}
