use crate::BoxError;
use derive_more::Display;
use thiserror::Error;

/// The error returned by sandboxed filesystem operations
#[derive(Debug, Error)]
#[error("filesystem error: {kind}")]
pub struct Error {
    kind: ErrorKind,
    #[source]
    source: Option<BoxError>,
}

impl Error {
    /// Creates a new filesystem error with an underlying cause
    pub fn new<E>(kind: ErrorKind, error: E) -> Error
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Error {
            kind,
            source: Some(error.into()),
        }
    }

    /// Detailed information about what the FTP server should do with the failure
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error { kind, source: None }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
            std::io::ErrorKind::AlreadyExists => ErrorKind::AlreadyExists,
            _ => ErrorKind::LocalError,
        };
        Error::new(kind, err)
    }
}

/// The `ErrorKind` variants that can be produced by the sandboxed filesystem.
/// Every variant maps to a single FTP reply code.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Display)]
pub enum ErrorKind {
    /// 550 Requested action not taken. File or directory does not exist.
    #[display(fmt = "550 File or directory not found")]
    NotFound,
    /// 550 Requested action not taken. The host denied access.
    #[display(fmt = "550 Permission denied")]
    PermissionDenied,
    /// 550 The resolved path falls outside of the sandbox root.
    #[display(fmt = "550 Path is outside of the user root")]
    SandboxViolation,
    /// 550 The target already exists (e.g. `MKD` on an existing name).
    #[display(fmt = "550 Already exists")]
    AlreadyExists,
    /// 550 A directory was required but the path is not one.
    #[display(fmt = "550 Not a directory")]
    NotADirectory,
    /// 550 A regular file was required but the path is a directory.
    #[display(fmt = "550 Is a directory")]
    IsADirectory,
    /// 550 Some other local error while processing.
    #[display(fmt = "550 Local error in processing")]
    LocalError,
}
