use super::error::CommandLineError;
use super::token::Token;
use std::collections::VecDeque;

/// Position over the canonical token stream.
///
/// Tokens are stored as strings and classified each time they are looked at,
/// so a peeked token can still be taken verbatim with [`Cursor::raw_pop`].
#[derive(Debug)]
pub struct Cursor {
    args: VecDeque<String>,
}

impl Cursor {
    pub fn new(args: VecDeque<String>) -> Self {
        Self { args }
    }

    pub fn should_continue(&self) -> bool {
        !self.args.is_empty()
    }

    pub fn pop(&mut self) -> Result<Token, CommandLineError> {
        let arg = self.args.pop_front().ok_or(CommandLineError::UnexpectedEnd)?;
        Token::classify(&arg)
    }

    /// Classifies the front token without consuming it. `None` at end of input.
    pub fn peek(&self) -> Result<Option<Token>, CommandLineError> {
        self.args.front().map(|arg| Token::classify(arg)).transpose()
    }

    /// Drops the token just inspected with [`Cursor::peek`].
    pub fn post_peek_pop(&mut self) {
        self.args.pop_front();
    }

    /// Takes the value of a pass-through `flag` without classifying it.
    pub fn raw_pop(&mut self, flag: &str) -> Result<String, CommandLineError> {
        self.args
            .pop_front()
            .ok_or_else(|| CommandLineError::MissingValue(flag.to_string()))
    }
}
