use crate::toolchain::ToolchainError;
use thiserror::Error;

/// Everything the interpreter itself can reject. The set is closed; any
/// failure that is not listed here comes from a collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandLineError {
    #[error("unknown argument: {0}")]
    UnknownFlag(String),

    #[error("unexpected argument: {0}")]
    UnexpectedArgument(String),

    #[error("both --help and {0} specified")]
    HelpConflict(String),

    #[error("multiple modes specified: {0}, {1}")]
    MultipleModes(String, String),

    #[error("option `--chdir' requires subsequent directory argument")]
    MissingDirectory,

    #[error("option `{0}' requires a subsequent argument")]
    MissingValue(String),

    #[error("unexpected end of arguments")]
    UnexpectedEnd,

    #[error("unknown {kind}: {value}")]
    InvalidQualifier { kind: &'static str, value: String },
}

/// Failure of [`parse`](super::parse).
///
/// Toolchain lookup happens while the build mode is resolved; its error is
/// passed through as-is.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    CommandLine(#[from] CommandLineError),

    #[error(transparent)]
    Toolchain(#[from] ToolchainError),
}
