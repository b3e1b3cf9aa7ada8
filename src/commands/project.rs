use super::Session;
use crate::build::collect_sources;
use crate::deps;
use crate::manifest::project_root;
use crate::xcodeproj::{generate, resolve_destination};
use anyhow::Result;
use colored::*;
use std::path::{Path, PathBuf};

pub fn generate_xcodeproj(outpath: Option<&Path>, session: &Session) -> Result<()> {
    let root = project_root()?;
    let (package, _) = deps::fetch(&root)?;
    let sources = collect_sources(&root);

    let dest = resolve_destination(outpath, &root, &package.name);
    let bundle = generate(&dest, &root, &sources)?;
    let bundle = std::path::absolute(&bundle).unwrap_or(bundle);

    println!(
        "{} generated: {}",
        "✓".green(),
        prettied(&bundle, &session.original_dir).display()
    );
    Ok(())
}

/// Shortens `path` for display relative to where the user started.
///
/// `./name` when it sits directly in `origin`, a relative path when it is
/// below it, and unchanged otherwise.
pub fn prettied(path: &Path, origin: &Path) -> PathBuf {
    if path.parent() == Some(origin)
        && let Some(name) = path.file_name()
    {
        return Path::new(".").join(name);
    }
    match path.strip_prefix(origin) {
        Ok(rel) if !rel.as_os_str().is_empty() => rel.to_path_buf(),
        _ => path.to_path_buf(),
    }
}
