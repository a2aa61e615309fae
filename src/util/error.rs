//! Error types for the scene-stage library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for scene-stage operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The store could not be opened (missing, corrupt, wrong format)
    #[error("Failed to open stage '{path}': {reason}")]
    Open { path: PathBuf, reason: String },

    /// Mutation attempted on a read-only session
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Child lookup failed under the throw-if-missing policy
    #[error("Child \"{0}\" does not exist")]
    MissingChild(String),

    /// Caller supplied an argument the operation cannot honour
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No registered format for this file extension and mode
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Malformed stage path
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// No prim at the given stage path
    #[error("Prim not found: {0}")]
    PrimNotFound(String),

    /// Invalid magic bytes at start of a binary layer
    #[error("Invalid layer file: expected stage magic bytes")]
    InvalidMagic,

    /// Unsupported binary layer version
    #[error("Unsupported layer version: {0}")]
    UnsupportedVersion(u16),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Layer (de)serialization error
    #[error("Layer encoding error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an "other" error from a string.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Create an open error for `path`.
    pub fn open(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Open {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Create an unsupported-operation error.
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::UnsupportedOperation(msg.into())
    }

    /// Create an invalid-argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

/// Result type alias for scene-stage operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = Error::MissingChild("geo".into());
        assert_eq!(e.to_string(), "Child \"geo\" does not exist");

        let e = Error::open("/tmp/a.stage", "corrupt");
        assert!(e.to_string().contains("/tmp/a.stage"));
        assert!(e.to_string().contains("corrupt"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
