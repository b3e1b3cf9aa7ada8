//! Toolchain discovery.
//!
//! The C compiler comes from `CC` when set, else from the cached result in
//! `~/.swift-build/toolchain.toml`, else from a `which` search for
//! `clang`/`gcc`. `SWIFT_EXEC` then overrides the Swift compiler in all cases.

pub mod types;

pub use types::{CompilerType, Toolchain, ToolchainError};

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Finds the toolchain for a build, caching a fresh detection.
pub fn user_toolchain() -> Result<Toolchain, ToolchainError> {
    resolve_toolchain(&get_toolchain_cache_path(), |key| std::env::var_os(key))
}

/// `CC` replaces the cached or detected C compiler. `SWIFT_EXEC` replaces
/// the Swift compiler of whichever toolchain was chosen.
fn resolve_toolchain(
    cache_path: &Path,
    env: impl Fn(&str) -> Option<OsString>,
) -> Result<Toolchain, ToolchainError> {
    let mut toolchain = match env("CC") {
        Some(cc) => {
            let toolchain = from_cc(Path::new(&cc))?;
            tracing::debug!(cc = %toolchain.cc_path.display(), "toolchain from environment");
            toolchain
        }
        None => cached_or_detected(cache_path)?,
    };

    if let Some(exec) = env("SWIFT_EXEC") {
        let exec = Path::new(&exec);
        let swiftc = which(exec).ok_or_else(|| {
            ToolchainError::NotFound(format!(
                "SWIFT_EXEC is set to '{}' but it cannot be found",
                exec.display()
            ))
        })?;
        tracing::debug!(swiftc = %swiftc.display(), "swift compiler from environment");
        toolchain.swiftc_path = Some(swiftc);
    }

    Ok(toolchain)
}

fn from_cc(cc: &Path) -> Result<Toolchain, ToolchainError> {
    let cc_path = which(cc).ok_or_else(|| {
        ToolchainError::NotFound(format!("CC is set to '{}' but it cannot be found", cc.display()))
    })?;
    let compiler_type = compiler_type_of(&cc_path);
    let version = compiler_version(&cc_path);
    Ok(Toolchain::new_simple(compiler_type, cc_path, which(Path::new("swiftc")), version))
}

fn detect_toolchain() -> Result<Toolchain, ToolchainError> {
    let swiftc_path = which(Path::new("swiftc"));

    for (cmd, compiler_type) in [("clang", CompilerType::Clang), ("gcc", CompilerType::GCC)] {
        if let Some(cc_path) = which(Path::new(cmd)) {
            let version = compiler_version(&cc_path);
            return Ok(Toolchain::new_simple(compiler_type, cc_path, swiftc_path, version));
        }
    }

    Err(ToolchainError::NotFound(
        "No C compiler found. Please install clang or gcc.".to_string(),
    ))
}

/// The cached toolchain if its compilers still exist, else a fresh detection
/// written back to the cache.
fn cached_or_detected(cache_path: &Path) -> Result<Toolchain, ToolchainError> {
    if let Ok(contents) = std::fs::read_to_string(cache_path)
        && let Ok(cached) = toml::from_str::<Toolchain>(&contents)
        && cached.is_present()
    {
        tracing::debug!(path = %cache_path.display(), "using cached toolchain");
        return Ok(cached);
    }

    let toolchain = detect_toolchain()?;

    if let Ok(toml_str) = toml::to_string_pretty(&toolchain)
        && let Some(parent) = cache_path.parent()
    {
        let _ = std::fs::create_dir_all(parent);
        let _ = std::fs::write(cache_path, toml_str);
    }

    Ok(toolchain)
}

fn get_toolchain_cache_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".swift-build")
        .join("toolchain.toml")
}

/// Resolves `cmd` to an absolute path. Paths with a directory part are
/// returned as-is when they exist.
fn which(cmd: &Path) -> Option<PathBuf> {
    if cmd.components().count() > 1 {
        return cmd.exists().then(|| cmd.to_path_buf());
    }
    let output = Command::new("which").arg(cmd).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let path_str = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!path_str.is_empty()).then(|| PathBuf::from(path_str))
}

fn compiler_type_of(cc_path: &Path) -> CompilerType {
    let name = cc_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    if name.contains("gcc") || name.contains("g++") {
        CompilerType::GCC
    } else {
        CompilerType::Clang
    }
}

fn compiler_version(cc_path: &Path) -> String {
    Command::new(cc_path)
        .arg("--version")
        .output()
        .map(|o| {
            String::from_utf8_lossy(&o.stdout)
                .lines()
                .next()
                .unwrap_or("unknown")
                .to_string()
        })
        .unwrap_or_else(|_| "unknown".to_string())
}
