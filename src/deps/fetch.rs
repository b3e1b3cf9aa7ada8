//! Dependency cloning.
//!
//! Each dependency of the root manifest is cloned with git into
//! `Packages/<name>-<version>`, where the version is the highest tag that
//! satisfies the manifest's requirement. Clones are staged in a hidden
//! directory and only moved into place once the checkout succeeded. Existing
//! clones are reused as long as their version still satisfies the requirement.

use crate::lock::PACKAGES_DIR;
use crate::manifest::{Dependency, Manifest, Package};
use anyhow::{Context, Result};
use colored::*;
use git2::Repository;
use indicatif::{ProgressBar, ProgressStyle};
use semver::{Version, VersionReq};
use std::fs;
use std::path::{Path, PathBuf};

/// Makes every dependency of `root` available under `root/Packages`.
///
/// Returns the root package and the external packages in manifest order.
pub fn fetch(root: &Path) -> Result<(Package, Vec<Package>)> {
    let manifest = Manifest::load(root)?;
    let root_package = Package::root(root, &manifest)?;

    let packages_dir = root.join(PACKAGES_DIR);
    let mut external = Vec::with_capacity(manifest.dependencies.len());
    for (name, dep) in &manifest.dependencies {
        external.push(fetch_dependency(&packages_dir, name, dep)?);
    }

    Ok((root_package, external))
}

fn fetch_dependency(packages_dir: &Path, name: &str, dep: &Dependency) -> Result<Package> {
    let requirement = dep
        .version
        .as_deref()
        .map(VersionReq::parse)
        .transpose()
        .with_context(|| format!("Invalid version requirement for '{}'", name))?;

    if let Some((path, version)) = existing_clone(packages_dir, name)? {
        if let Some(req) = &requirement
            && !version.as_ref().is_some_and(|v| req.matches(v))
        {
            return Err(anyhow::anyhow!(
                "Existing clone {} does not satisfy the requirement '{}' for '{}'.\n\n\
                Tip: Run 'swift-build --clean=dist' and fetch again.",
                path.display(),
                req,
                name
            ));
        }
        println!("   {} Using existing clone: {}", "⚡".green(), name);
        return Ok(Package {
            name: name.to_string(),
            path,
            url: dep.url.clone(),
            version,
        });
    }

    fs::create_dir_all(packages_dir)
        .with_context(|| format!("Failed to create {}", packages_dir.display()))?;
    let staging = packages_dir.join(format!(".{}.partial", name));
    if staging.exists() {
        fs::remove_dir_all(&staging)
            .with_context(|| format!("Failed to remove {}", staging.display()))?;
    }

    let version = match clone_at_requirement(name, dep, requirement.as_ref(), &staging) {
        Ok(version) => version,
        Err(err) => {
            let _ = fs::remove_dir_all(&staging);
            return Err(err);
        }
    };

    let path = match &version {
        Some(v) => packages_dir.join(format!("{}-{}", name, v)),
        None => packages_dir.join(name),
    };
    fs::rename(&staging, &path)
        .with_context(|| format!("Failed to move clone of '{}' into place", name))?;

    Ok(Package {
        name: name.to_string(),
        path,
        url: dep.url.clone(),
        version,
    })
}

/// Clones into `dest` and checks out the best tag for `requirement`.
fn clone_at_requirement(
    name: &str,
    dep: &Dependency,
    requirement: Option<&VersionReq>,
    dest: &Path,
) -> Result<Option<Version>> {
    let repo = clone_repo(name, &dep.url, dest)?;
    match select_tag(&repo, requirement) {
        Some((tag, version)) => {
            checkout_tag(&repo, &tag)?;
            Ok(Some(version))
        }
        None => match requirement {
            Some(req) => Err(anyhow::anyhow!(
                "No tag of {} satisfies the requirement '{}' for '{}'",
                dep.url,
                req,
                name
            )),
            None => Ok(None),
        },
    }
}

/// Finds `Packages/<name>` or `Packages/<name>-<semver>`.
fn existing_clone(packages_dir: &Path, name: &str) -> Result<Option<(PathBuf, Option<Version>)>> {
    if !packages_dir.is_dir() {
        return Ok(None);
    }
    for entry in fs::read_dir(packages_dir)? {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }
        let dirname = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        if dirname == name {
            return Ok(Some((path, None)));
        }
        if let Some(suffix) = dirname.strip_prefix(name).and_then(|s| s.strip_prefix('-'))
            && let Ok(version) = Version::parse(suffix)
        {
            return Ok(Some((path, Some(version))));
        }
    }
    Ok(None)
}

fn clone_repo(name: &str, url: &str, dest: &Path) -> Result<Repository> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(format!("Cloning {}...", name));
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    tracing::info!(url, dest = %dest.display(), "cloning");
    match Repository::clone(url, dest) {
        Ok(repo) => {
            pb.finish_with_message(format!("{} Cloned {}", "✓".green(), name));
            Ok(repo)
        }
        Err(err) => {
            pb.finish_with_message(format!("{} Failed {}", "x".red(), name));
            Err(anyhow::anyhow!("Failed to clone '{}' from {}: {}", name, url, err))
        }
    }
}

/// Parses `1.2.3` and `v1.2.3` style tags.
fn tag_version(tag: &str) -> Option<Version> {
    Version::parse(tag.strip_prefix('v').unwrap_or(tag)).ok()
}

fn select_tag(repo: &Repository, requirement: Option<&VersionReq>) -> Option<(String, Version)> {
    let names = repo.tag_names(None).ok()?;
    best_tag(names.iter().flatten(), requirement)
}

/// Highest semver tag accepted by `requirement` (any tag when `None`).
fn best_tag<'a>(
    tags: impl IntoIterator<Item = &'a str>,
    requirement: Option<&VersionReq>,
) -> Option<(String, Version)> {
    tags.into_iter()
        .filter_map(|tag| tag_version(tag).map(|v| (tag.to_string(), v)))
        .filter(|(_, v)| requirement.is_none_or(|req| req.matches(v)))
        .max_by(|a, b| a.1.cmp(&b.1))
}

fn checkout_tag(repo: &Repository, tag: &str) -> Result<()> {
    let obj = repo
        .revparse_single(&format!("refs/tags/{}", tag))
        .with_context(|| format!("Failed to resolve tag {}", tag))?;
    let commit = obj.peel_to_commit()?;
    repo.set_head_detached(commit.id())?;
    let mut checkout_opts = git2::build::CheckoutBuilder::new();
    checkout_opts.force();
    repo.checkout_tree(commit.as_object(), Some(&mut checkout_opts))
        .with_context(|| format!("Failed to checkout tag {}", tag))?;
    println!("   {} Checked out {}", "📌".blue(), tag);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_version_accepts_v_prefix() {
        assert_eq!(tag_version("v1.2.3"), Some(Version::new(1, 2, 3)));
        assert_eq!(tag_version("1.0.0"), Some(Version::new(1, 0, 0)));
        assert_eq!(tag_version("release-1"), None);
    }

    #[test]
    fn test_best_tag_respects_requirement() {
        let tags = ["1.0.0", "v1.4.2", "2.0.0", "nightly", "1.4.10"];
        let req = VersionReq::parse("^1.0").unwrap();
        assert_eq!(
            best_tag(tags, Some(&req)),
            Some(("1.4.10".to_string(), Version::new(1, 4, 10)))
        );
        assert_eq!(best_tag(tags, None).map(|(t, _)| t), Some("2.0.0".to_string()));
        let none = VersionReq::parse(">=3").unwrap();
        assert_eq!(best_tag(tags, Some(&none)), None);
    }

    #[test]
    fn test_existing_clone_lookup() {
        let dir = tempfile::tempdir().unwrap();
        assert!(existing_clone(dir.path(), "Dep").unwrap().is_none());

        fs::create_dir(dir.path().join("Dep-1.2.0")).unwrap();
        fs::create_dir(dir.path().join("DepExtra")).unwrap();
        let (path, version) = existing_clone(dir.path(), "Dep").unwrap().unwrap();
        assert_eq!(path, dir.path().join("Dep-1.2.0"));
        assert_eq!(version, Some(Version::new(1, 2, 0)));
    }

    /// A repository with one commit carrying every tag in `tags`.
    fn upstream_with_tags(dir: &Path, tags: &[&str]) -> String {
        let repo = Repository::init(dir).unwrap();
        fs::write(dir.join("Dep.swift"), "public let answer = 42\n").unwrap();
        let mut index = repo.index().unwrap();
        index.add_path(Path::new("Dep.swift")).unwrap();
        index.write().unwrap();
        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
        let sig = git2::Signature::now("Dealer", "dealer@example.com").unwrap();
        let oid = repo.commit(Some("HEAD"), &sig, &sig, "initial", &tree, &[]).unwrap();
        let commit = repo.find_commit(oid).unwrap();
        for tag in tags {
            repo.tag_lightweight(tag, commit.as_object(), false).unwrap();
        }
        dir.to_string_lossy().to_string()
    }

    fn package_depending_on(dir: &Path, url: &str, requirement: &str) {
        fs::write(
            dir.join(crate::manifest::MANIFEST_FILE),
            format!(
                "[package]\nname = \"app\"\n\n[dependencies]\nDep = {{ url = \"{url}\", version = \"{requirement}\" }}\n"
            ),
        )
        .unwrap();
    }

    fn packages_entries(root: &Path) -> Vec<String> {
        let mut names: Vec<_> = fs::read_dir(root.join(PACKAGES_DIR))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_fetch_checks_out_matching_tag() {
        let upstream = tempfile::tempdir().unwrap();
        let url = upstream_with_tags(upstream.path(), &["1.0.0", "v1.2.0", "2.0.0"]);
        let project = tempfile::tempdir().unwrap();
        package_depending_on(project.path(), &url, "^1.0");

        let (_, external) = fetch(project.path()).unwrap();
        assert_eq!(external.len(), 1);
        assert_eq!(external[0].version, Some(Version::new(1, 2, 0)));
        assert_eq!(external[0].path, project.path().join(PACKAGES_DIR).join("Dep-1.2.0"));
        assert!(external[0].path.join("Dep.swift").exists());
        assert_eq!(packages_entries(project.path()), vec!["Dep-1.2.0"]);

        // A second fetch reuses the clone.
        let (_, again) = fetch(project.path()).unwrap();
        assert_eq!(again, external);
    }

    #[test]
    fn test_unsatisfied_requirement_leaves_nothing_behind() {
        let upstream = tempfile::tempdir().unwrap();
        let url = upstream_with_tags(upstream.path(), &["1.0.0"]);
        let project = tempfile::tempdir().unwrap();
        package_depending_on(project.path(), &url, "^2.0");

        let err = fetch(project.path()).unwrap_err();
        assert!(err.to_string().contains("satisfies the requirement '^2.0'"), "{}", err);
        assert!(packages_entries(project.path()).is_empty());

        // Retrying still fails instead of picking up a leftover clone.
        assert!(fetch(project.path()).is_err());
        assert!(packages_entries(project.path()).is_empty());
    }

    #[test]
    fn test_existing_clone_must_satisfy_requirement() {
        let upstream = tempfile::tempdir().unwrap();
        let url = upstream_with_tags(upstream.path(), &["1.0.0"]);
        let project = tempfile::tempdir().unwrap();
        package_depending_on(project.path(), &url, "^1.0");
        fetch(project.path()).unwrap();

        package_depending_on(project.path(), &url, "^2.0");
        let err = fetch(project.path()).unwrap_err();
        assert!(err.to_string().contains("does not satisfy"), "{}", err);

        fs::create_dir_all(project.path().join(PACKAGES_DIR).join("Other")).unwrap();
        fs::remove_dir_all(project.path().join(PACKAGES_DIR).join("Dep-1.0.0")).unwrap();
        fs::create_dir(project.path().join(PACKAGES_DIR).join("Dep")).unwrap();
        let err = fetch(project.path()).unwrap_err();
        assert!(err.to_string().contains("does not satisfy"), "{}", err);
    }

    #[test]
    fn test_untagged_dependency_without_requirement() {
        let upstream = tempfile::tempdir().unwrap();
        let url = upstream_with_tags(upstream.path(), &[]);
        let project = tempfile::tempdir().unwrap();
        fs::write(
            project.path().join(crate::manifest::MANIFEST_FILE),
            format!("[package]\nname = \"app\"\n\n[dependencies]\nDep = {{ url = \"{url}\" }}\n"),
        )
        .unwrap();

        let (_, external) = fetch(project.path()).unwrap();
        assert_eq!(external[0].version, None);
        assert_eq!(packages_entries(project.path()), vec!["Dep"]);
    }

    #[test]
    fn test_fetch_without_dependencies() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(crate::manifest::MANIFEST_FILE),
            "[package]\nname = \"solo\"\n",
        )
        .unwrap();
        let (root, external) = fetch(dir.path()).unwrap();
        assert_eq!(root.name, "solo");
        assert!(external.is_empty());
        assert!(!dir.path().join(PACKAGES_DIR).exists());
    }
}
