//! Contains the `ControlChanError` struct that defines the control channel error type.

use super::parse_error::ParseError;
use crate::BoxError;
use derive_more::Display;
use thiserror::Error;

/// The error type produced while reading, parsing and dispatching control
/// channel traffic.
#[derive(Debug, Error)]
#[error("control channel error: {kind}")]
pub struct ControlChanError {
    kind: ControlChanErrorKind,
    #[source]
    source: Option<BoxError>,
}

/// A list specifying categories of control channel errors.
#[derive(Eq, PartialEq, Debug, Display, Clone, Copy)]
#[allow(dead_code)]
pub enum ControlChanErrorKind {
    /// We encountered a system IO error.
    #[display(fmt = "failed to perform IO")]
    IoError,
    /// Something went wrong parsing the client's command.
    #[display(fmt = "failed to parse command")]
    ParseError,
    /// Internal Server Error. This is probably a bug, i.e. when we're unable to lock a resource we
    /// should be able to lock.
    #[display(fmt = "internal server error")]
    InternalServerError,
    /// We encountered a non-UTF8 character in the command.
    #[display(fmt = "non-UTF8 character in command")]
    Utf8Error,
    /// The client issued a command that we know about, but in an invalid way (e.g. `USER` without
    /// a username).
    #[display(fmt = "invalid command (invalid parameter)")]
    InvalidCommand,
    /// The timer on the control channel elapsed.
    #[display(fmt = "encountered read timeout on the control channel")]
    ControlChannelTimeout,
    /// The control channel is out of sync, e.g. expecting a username in the session after a USER
    /// command but finding none.
    #[display(fmt = "control channel in illegal state")]
    IllegalState,
}

impl ControlChanError {
    /// Creates a new control channel error with the specific kind
    pub fn new(kind: ControlChanErrorKind) -> Self {
        ControlChanError { kind, source: None }
    }

    /// Return the inner error kind of this error.
    pub fn kind(&self) -> ControlChanErrorKind {
        self.kind
    }
}

impl From<ControlChanErrorKind> for ControlChanError {
    fn from(kind: ControlChanErrorKind) -> ControlChanError {
        ControlChanError { kind, source: None }
    }
}

impl From<std::io::Error> for ControlChanError {
    fn from(err: std::io::Error) -> ControlChanError {
        ControlChanError {
            kind: ControlChanErrorKind::IoError,
            source: Some(Box::new(err)),
        }
    }
}

impl From<std::str::Utf8Error> for ControlChanError {
    fn from(err: std::str::Utf8Error) -> ControlChanError {
        ControlChanError {
            kind: ControlChanErrorKind::Utf8Error,
            source: Some(Box::new(err)),
        }
    }
}

impl From<ParseError> for ControlChanError {
    fn from(err: ParseError) -> ControlChanError {
        let kind = match err {
            ParseError::InvalidUtf8 | ParseError::InvalidToken { .. } => ControlChanErrorKind::Utf8Error,
            ParseError::InvalidCommand | ParseError::InvalidEol => ControlChanErrorKind::InvalidCommand,
        };
        ControlChanError {
            kind,
            source: Some(Box::new(err)),
        }
    }
}
