use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Supported C compiler families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::upper_case_acronyms)]
pub enum CompilerType {
    /// Clang/LLVM
    Clang,
    /// GNU Compiler Collection
    GCC,
}

/// The compilers a build runs with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toolchain {
    pub compiler_type: CompilerType,

    /// Absolute path to the C compiler, also used as the linker driver
    pub cc_path: PathBuf,

    /// Swift compiler, when one is installed
    pub swiftc_path: Option<PathBuf>,

    /// First line of `cc --version`
    pub version: String,
}

impl Toolchain {
    pub fn new_simple(
        compiler_type: CompilerType,
        cc_path: PathBuf,
        swiftc_path: Option<PathBuf>,
        version: String,
    ) -> Self {
        Self {
            compiler_type,
            cc_path,
            swiftc_path,
            version,
        }
    }

    /// Every recorded compiler still exists on disk.
    pub fn is_present(&self) -> bool {
        self.cc_path.exists() && self.swiftc_path.as_ref().is_none_or(|p| p.exists())
    }
}

#[derive(Debug, Error)]
pub enum ToolchainError {
    /// No suitable compiler found
    #[error("Toolchain not found: {0}")]
    NotFound(String),
}
