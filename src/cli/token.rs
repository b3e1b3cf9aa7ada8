//! Token model and classifier.
//!
//! Every canonical token is one of three things: a mode keyword, a switch
//! keyword or a free-standing name. Classification is a pure lookup and is
//! re-run whenever the cursor looks at a token.

use super::error::CommandLineError;
use std::fmt;

/// Keywords that select the single operating mode of an invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeKeyword {
    Build,
    Clean,
    Fetch,
    GenerateXcodeproj,
    Init,
    Usage,
    Version,
    Lock,
    IgnoreLock,
}

impl ModeKeyword {
    pub const ALL: [ModeKeyword; 9] = [
        ModeKeyword::Build,
        ModeKeyword::Clean,
        ModeKeyword::Fetch,
        ModeKeyword::GenerateXcodeproj,
        ModeKeyword::Init,
        ModeKeyword::Usage,
        ModeKeyword::Version,
        ModeKeyword::Lock,
        ModeKeyword::IgnoreLock,
    ];

    /// Long spelling, used in diagnostics.
    pub fn spelling(self) -> &'static str {
        match self {
            ModeKeyword::Build => "--configuration",
            ModeKeyword::Clean => "--clean",
            ModeKeyword::Fetch => "--fetch",
            ModeKeyword::GenerateXcodeproj => "--generate-xcodeproj",
            ModeKeyword::Init => "--init",
            ModeKeyword::Usage => "--help",
            ModeKeyword::Version => "--version",
            ModeKeyword::Lock => "--lock",
            ModeKeyword::IgnoreLock => "--ignore-lock",
        }
    }

    fn short_alias(self) -> Option<&'static str> {
        match self {
            ModeKeyword::Build => Some("-c"),
            ModeKeyword::Clean => Some("-k"),
            ModeKeyword::GenerateXcodeproj => Some("-X"),
            ModeKeyword::Usage => Some("-h"),
            _ => None,
        }
    }

    pub fn from_spelling(arg: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kw| kw.spelling() == arg || kw.short_alias() == Some(arg))
    }
}

impl fmt::Display for ModeKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.spelling())
    }
}

/// Keywords that adjust [`Options`](super::Options) without selecting a mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchKeyword {
    Chdir,
    Verbose,
    Xcc,
    Xlinker,
    Xswiftc,
}

impl SwitchKeyword {
    pub const ALL: [SwitchKeyword; 5] = [
        SwitchKeyword::Chdir,
        SwitchKeyword::Verbose,
        SwitchKeyword::Xcc,
        SwitchKeyword::Xlinker,
        SwitchKeyword::Xswiftc,
    ];

    pub fn spelling(self) -> &'static str {
        match self {
            SwitchKeyword::Chdir => "--chdir",
            SwitchKeyword::Verbose => "--verbose",
            SwitchKeyword::Xcc => "-Xcc",
            SwitchKeyword::Xlinker => "-Xlinker",
            SwitchKeyword::Xswiftc => "-Xswiftc",
        }
    }

    fn short_alias(self) -> Option<&'static str> {
        match self {
            SwitchKeyword::Chdir => Some("-C"),
            SwitchKeyword::Verbose => Some("-v"),
            _ => None,
        }
    }

    pub fn from_spelling(arg: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kw| kw.spelling() == arg || kw.short_alias() == Some(arg))
    }

    /// Whether this switch swallows the next raw argument untouched.
    pub fn consumes_raw_argument(self) -> bool {
        matches!(
            self,
            SwitchKeyword::Xcc | SwitchKeyword::Xlinker | SwitchKeyword::Xswiftc
        )
    }
}

impl fmt::Display for SwitchKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.spelling())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Mode(ModeKeyword),
    Switch(SwitchKeyword),
    Name(String),
}

impl Token {
    /// Classifies one canonical token.
    ///
    /// Mode spellings win over switch spellings. Anything else that looks like
    /// a flag is rejected here instead of falling through to [`Token::Name`].
    pub fn classify(arg: &str) -> Result<Token, CommandLineError> {
        if let Some(mode) = ModeKeyword::from_spelling(arg) {
            return Ok(Token::Mode(mode));
        }
        if let Some(switch) = SwitchKeyword::from_spelling(arg) {
            return Ok(Token::Switch(switch));
        }
        if arg.starts_with('-') {
            return Err(CommandLineError::UnknownFlag(arg.to_string()));
        }
        Ok(Token::Name(arg.to_string()))
    }
}
