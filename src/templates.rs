//! Package skeletons for `--init`.
//!
//! - `executable` (default) - `Sources/main.swift`
//! - `library` - `Sources/<Name>.swift`

use crate::build::SOURCES_DIR;
use crate::cli::InitMode;
use crate::manifest::MANIFEST_FILE;
use anyhow::{Context, Result};
use colored::*;
use std::fs;
use std::path::Path;

pub fn manifest_template(name: &str) -> String {
    format!(
        r#"[package]
name = "{}"
version = "0.1.0"

[dependencies]
# Example = {{ url = "https://github.com/example/Example", version = "^1.0" }}
"#,
        name
    )
}

pub fn source_template(name: &str, mode: InitMode) -> (String, String) {
    match mode {
        InitMode::Executable => ("main.swift".to_string(), "print(\"Hello, world!\")\n".to_string()),
        InitMode::Library => (
            format!("{}.swift", name),
            format!("public struct {} {{\n\n    public init() {{}}\n}}\n", type_name(name)),
        ),
    }
}

const GITIGNORE: &str = ".DS_Store\n/.build\n/Packages\n/*.xcodeproj\n";

/// Writes a new package into `dir`, named after the directory.
pub fn init_package(dir: &Path, mode: InitMode) -> Result<()> {
    let manifest_path = dir.join(MANIFEST_FILE);
    if manifest_path.exists() {
        return Err(anyhow::anyhow!(
            "A manifest file already exists in {}",
            dir.display()
        ));
    }

    let name = dir
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .context("Cannot derive a package name from the current directory")?;

    let kind = match mode {
        InitMode::Executable => "executable",
        InitMode::Library => "library",
    };
    println!("{} Creating {} package: {}", "✨".cyan(), kind, name.bold());

    write_file(&manifest_path, &manifest_template(&name))?;

    let gitignore = dir.join(".gitignore");
    if !gitignore.exists() {
        write_file(&gitignore, GITIGNORE)?;
    }

    let sources = dir.join(SOURCES_DIR);
    fs::create_dir_all(&sources).with_context(|| format!("Failed to create {}", sources.display()))?;
    let (file, content) = source_template(&name, mode);
    let source_path = sources.join(file);
    if !source_path.exists() {
        write_file(&source_path, &content)?;
    }

    let tests = dir.join("Tests");
    fs::create_dir_all(&tests).with_context(|| format!("Failed to create {}", tests.display()))?;
    println!("   {} Created Tests/", "+".green());
    Ok(())
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    println!(
        "   {} Created {}",
        "+".green(),
        path.file_name().unwrap_or_default().to_string_lossy()
    );
    Ok(())
}

/// `my-lib` becomes `MyLib`.
fn type_name(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::Manifest;

    #[test]
    fn test_init_executable() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("dealer");
        fs::create_dir(&dir).unwrap();
        init_package(&dir, InitMode::Executable).unwrap();

        assert!(dir.join(SOURCES_DIR).join("main.swift").exists());
        assert!(dir.join("Tests").is_dir());
        assert!(dir.join(".gitignore").exists());
        let manifest = Manifest::load(&dir).unwrap();
        assert_eq!(manifest.package.name.as_deref(), Some("dealer"));
    }

    #[test]
    fn test_init_library() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("deck-of-cards");
        fs::create_dir(&dir).unwrap();
        init_package(&dir, InitMode::Library).unwrap();

        let source = fs::read_to_string(dir.join(SOURCES_DIR).join("deck-of-cards.swift")).unwrap();
        assert!(source.contains("public struct DeckOfCards"));
        assert!(!dir.join(SOURCES_DIR).join("main.swift").exists());
    }

    #[test]
    fn test_init_refuses_existing_manifest() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join(MANIFEST_FILE), "").unwrap();
        assert!(init_package(tmp.path(), InitMode::Executable).is_err());
    }

    #[test]
    fn test_type_name() {
        assert_eq!(type_name("my-lib"), "MyLib");
        assert_eq!(type_name("Already"), "Already");
        assert_eq!(type_name("a_b_c"), "ABC");
    }
}
