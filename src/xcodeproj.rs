//! Xcode project generation for `--generate-xcodeproj`.
//!
//! The emitted `project.pbxproj` is a plain reference project: one file
//! reference per source of the root package, grouped under the main group.

use crate::build::SourceFiles;
use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

pub const PROJECT_SUFFIX: &str = ".xcodeproj";

/// Where the project goes and what it is called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub dir: PathBuf,
    pub name: String,
}

/// - `Foo/Bar.xcodeproj` → `Bar` in `Foo/`
/// - any other path → the package name in that directory
/// - no path → the package name in the project root
pub fn resolve_destination(outpath: Option<&Path>, root: &Path, package_name: &str) -> Destination {
    match outpath {
        Some(path) => {
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            match file_name.strip_suffix(PROJECT_SUFFIX) {
                Some(stem) => Destination {
                    dir: path.parent().map(Path::to_path_buf).unwrap_or_default(),
                    name: stem.to_string(),
                },
                None => Destination {
                    dir: path.to_path_buf(),
                    name: package_name.to_string(),
                },
            }
        }
        None => Destination {
            dir: root.to_path_buf(),
            name: package_name.to_string(),
        },
    }
}

/// Writes `<dir>/<name>.xcodeproj/project.pbxproj` and returns the bundle path.
pub fn generate(dest: &Destination, srcroot: &Path, sources: &SourceFiles) -> Result<PathBuf> {
    let bundle = dest.dir.join(format!("{}{}", dest.name, PROJECT_SUFFIX));
    fs::create_dir_all(&bundle).with_context(|| format!("Failed to create {}", bundle.display()))?;

    let pbxproj = render_pbxproj(&dest.name, srcroot, sources);
    let path = bundle.join("project.pbxproj");
    fs::write(&path, pbxproj).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "wrote project");
    Ok(bundle)
}

/// Deterministic 24-character object id.
fn object_id(key: &str) -> String {
    let digest = Sha256::digest(key.as_bytes());
    digest[..12].iter().map(|b| format!("{:02X}", b)).collect()
}

fn file_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("swift") => "sourcecode.swift",
        Some("c") => "sourcecode.c.c",
        _ => "text",
    }
}

pub fn render_pbxproj(name: &str, srcroot: &Path, sources: &SourceFiles) -> String {
    let mut refs = Vec::new();
    for src in sources.all() {
        let rel = src.strip_prefix(srcroot).unwrap_or(src).to_string_lossy().to_string();
        refs.push((object_id(&format!("file:{}", rel)), rel, file_type(src)));
    }
    let group_id = object_id(&format!("group:{}", name));
    let project_id = object_id(&format!("project:{}", name));

    let mut out = String::new();
    out.push_str("// !$*UTF8*$!\n{\n");
    out.push_str("\tarchiveVersion = 1;\n\tclasses = {\n\t};\n\tobjectVersion = 46;\n\tobjects = {\n");
    for (id, rel, kind) in &refs {
        let _ = writeln!(
            out,
            "\t\t{} = {{isa = PBXFileReference; lastKnownFileType = {}; path = \"{}\"; sourceTree = \"<group>\"; }};",
            id, kind, rel
        );
    }
    let children: Vec<&str> = refs.iter().map(|(id, _, _)| id.as_str()).collect();
    let _ = writeln!(
        out,
        "\t\t{} = {{isa = PBXGroup; children = ({}); sourceTree = \"<group>\"; }};",
        group_id,
        children.join(", ")
    );
    let _ = writeln!(
        out,
        "\t\t{} = {{isa = PBXProject; mainGroup = {}; projectDirPath = \"{}\"; targets = (); }};",
        project_id,
        group_id,
        srcroot.display()
    );
    out.push_str("\t};\n");
    let _ = writeln!(out, "\trootObject = {};", project_id);
    out.push_str("}\n");
    out
}
