//! Command-line interpretation.
//!
//! The process arguments are normalized by [`tokenize`], walked by a
//! [`Cursor`](cursor::Cursor) that classifies tokens on demand, and resolved
//! by [`parse`] into exactly one [`Mode`] plus the accumulated [`Options`].
//!
//! ```text
//! -c release -vv -Xcc -I/opt/include
//!   => Mode::Build(Release, toolchain), verbosity 2, xcc ["-I/opt/include"]
//! ```

mod cursor;
mod error;
mod token;
mod tokenize;
mod usage;

pub use error::{CommandLineError, Error};
pub use token::{ModeKeyword, SwitchKeyword, Token};
pub use tokenize::tokenize;
pub use usage::{USAGE, print_usage, version_string};

use crate::toolchain::{Toolchain, ToolchainError};
use crate::verbosity::Verbosity;
use cursor::Cursor;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Configuration {
    Debug,
    Release,
}

impl Configuration {
    fn from_literal(name: &str) -> Option<Self> {
        match name {
            "debug" => Some(Configuration::Debug),
            "release" => Some(Configuration::Release),
            _ => None,
        }
    }

    /// Directory name under `.build/`.
    pub fn dirname(self) -> &'static str {
        match self {
            Configuration::Debug => "debug",
            Configuration::Release => "release",
        }
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dirname())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanMode {
    /// Remove `.build/` only.
    Build,
    /// Remove `Packages/` as well.
    Dist,
}

impl CleanMode {
    fn from_literal(name: &str) -> Option<Self> {
        match name {
            "build" => Some(CleanMode::Build),
            "dist" => Some(CleanMode::Dist),
            _ => None,
        }
    }
}

impl fmt::Display for CleanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CleanMode::Build => f.write_str("build"),
            CleanMode::Dist => f.write_str("dist"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitMode {
    Executable,
    Library,
}

impl InitMode {
    fn from_literal(name: &str) -> Option<Self> {
        match name {
            "executable" => Some(InitMode::Executable),
            "library" => Some(InitMode::Library),
            _ => None,
        }
    }
}

/// The single action an invocation asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Build(Configuration, Toolchain),
    Clean(CleanMode),
    Fetch,
    Init(InitMode),
    Usage,
    Version,
    GenerateXcodeproj(Option<PathBuf>),
    Lock,
    IgnoreLock,
}

impl Mode {
    pub fn keyword(&self) -> ModeKeyword {
        match self {
            Mode::Build(..) => ModeKeyword::Build,
            Mode::Clean(_) => ModeKeyword::Clean,
            Mode::Fetch => ModeKeyword::Fetch,
            Mode::Init(_) => ModeKeyword::Init,
            Mode::Usage => ModeKeyword::Usage,
            Mode::Version => ModeKeyword::Version,
            Mode::GenerateXcodeproj(_) => ModeKeyword::GenerateXcodeproj,
            Mode::Lock => ModeKeyword::Lock,
            Mode::IgnoreLock => ModeKeyword::IgnoreLock,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Build(conf, _) => write!(f, "{} {}", ModeKeyword::Build, conf),
            Mode::Clean(clean) => write!(f, "{}={}", ModeKeyword::Clean, clean),
            other => write!(f, "{}", other.keyword()),
        }
    }
}

/// Settings gathered from switches, independent of the resolved mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    pub chdir: Option<PathBuf>,
    pub verbosity: u32,
    /// Flags for every C compiler invocation (`-Xcc`).
    pub xcc: Vec<String>,
    /// Flags for every link (`-Xlinker`).
    pub xld: Vec<String>,
    /// Flags for every Swift compiler invocation (`-Xswiftc`).
    pub xswiftc: Vec<String>,
}

impl Options {
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_count(self.verbosity)
    }
}

/// Resolves `args` (program name excluded) into a mode and options.
///
/// `toolchain` is called only when a build mode is resolved, including the
/// default build used when no mode keyword appears.
pub fn parse<I, S, F>(args: I, mut toolchain: F) -> Result<(Mode, Options), Error>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    F: FnMut() -> Result<Toolchain, ToolchainError>,
{
    let mut cursor = Cursor::new(tokenize(args));
    let mut opts = Options::default();
    let mut mode: Option<Mode> = None;

    while cursor.should_continue() {
        match cursor.pop()? {
            Token::Mode(keyword) => {
                if let Some(current) = &mode {
                    if current.keyword() != keyword {
                        return Err(conflict(current, keyword).into());
                    }
                    continue;
                }
                mode = Some(resolve_mode(keyword, &mut cursor, &mut toolchain)?);
            }

            Token::Switch(SwitchKeyword::Verbose) => opts.verbosity += 1,

            Token::Switch(SwitchKeyword::Chdir) => match cursor.peek()? {
                Some(Token::Name(dir)) if !dir.is_empty() => {
                    cursor.post_peek_pop();
                    opts.chdir = Some(PathBuf::from(dir));
                }
                _ => return Err(CommandLineError::MissingDirectory.into()),
            },

            Token::Switch(flag @ SwitchKeyword::Xcc) => opts.xcc.push(cursor.raw_pop(flag.spelling())?),
            Token::Switch(flag @ SwitchKeyword::Xlinker) => {
                opts.xld.push(cursor.raw_pop(flag.spelling())?)
            }
            Token::Switch(flag @ SwitchKeyword::Xswiftc) => {
                opts.xswiftc.push(cursor.raw_pop(flag.spelling())?)
            }

            Token::Name(name) => return Err(CommandLineError::UnexpectedArgument(name).into()),
        }
    }

    match mode {
        Some(mode) => Ok((mode, opts)),
        None => Ok((Mode::Build(Configuration::Debug, toolchain()?), opts)),
    }
}

fn conflict(current: &Mode, keyword: ModeKeyword) -> CommandLineError {
    match (current, keyword) {
        (Mode::Usage, other) => CommandLineError::HelpConflict(other.to_string()),
        (other, ModeKeyword::Usage) => CommandLineError::HelpConflict(other.to_string()),
        (other, keyword) => CommandLineError::MultipleModes(other.to_string(), keyword.to_string()),
    }
}

fn resolve_mode<F>(keyword: ModeKeyword, cursor: &mut Cursor, toolchain: &mut F) -> Result<Mode, Error>
where
    F: FnMut() -> Result<Toolchain, ToolchainError>,
{
    let mode = match keyword {
        ModeKeyword::Build => {
            let conf = qualifier(cursor, "build configuration", Configuration::from_literal)?
                .unwrap_or(Configuration::Debug);
            Mode::Build(conf, toolchain()?)
        }
        ModeKeyword::Clean => Mode::Clean(
            qualifier(cursor, "clean mode", CleanMode::from_literal)?.unwrap_or(CleanMode::Build),
        ),
        ModeKeyword::Init => Mode::Init(
            qualifier(cursor, "init mode", InitMode::from_literal)?.unwrap_or(InitMode::Executable),
        ),
        ModeKeyword::GenerateXcodeproj => {
            Mode::GenerateXcodeproj(qualifier(cursor, "output path", |path| Some(PathBuf::from(path)))?)
        }
        ModeKeyword::Fetch => Mode::Fetch,
        ModeKeyword::Usage => Mode::Usage,
        ModeKeyword::Version => Mode::Version,
        ModeKeyword::Lock => Mode::Lock,
        ModeKeyword::IgnoreLock => Mode::IgnoreLock,
    };
    Ok(mode)
}

/// Consumes an optional name right after a mode keyword.
///
/// Nothing is consumed when the next token is not a name. A name that
/// `lookup` does not recognize is an error on the spot.
fn qualifier<T>(
    cursor: &mut Cursor,
    kind: &'static str,
    lookup: impl Fn(&str) -> Option<T>,
) -> Result<Option<T>, CommandLineError> {
    match cursor.peek()? {
        Some(Token::Name(name)) => match lookup(&name) {
            Some(value) => {
                cursor.post_peek_pop();
                Ok(Some(value))
            }
            None => Err(CommandLineError::InvalidQualifier { kind, value: name }),
        },
        _ => Ok(None),
    }
}
