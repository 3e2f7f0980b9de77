use std::str::Utf8Error;
use thiserror::Error;

/// The error type returned by the [Command::parse] method.
///
/// [Command::parse]: super::Command::parse
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The client issued a command we know about, but in an invalid way
    /// (e.g. a missing or malformed required parameter).
    #[error("invalid command (invalid parameter)")]
    InvalidCommand,

    /// An invalid token was encountered while parsing the command.
    #[error("invalid token while parsing: {token}")]
    InvalidToken {
        /// The byte that is not allowed in a command line.
        token: u8,
    },

    /// Non-UTF8 character encountered.
    #[error("non-UTF8 character while parsing")]
    InvalidUtf8,

    /// Invalid end-of-line character.
    #[error("invalid end-of-line")]
    InvalidEol,
}

impl From<Utf8Error> for ParseError {
    fn from(_: Utf8Error) -> ParseError {
        ParseError::InvalidUtf8
    }
}

/// The Result type used in this module.
pub type Result<T> = std::result::Result<T, ParseError>;
