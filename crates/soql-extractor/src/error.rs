//! Error types for soql-extractor.
//!
//! Every error here is fatal for a scan: there is no per-file recovery.

use std::path::{Path, PathBuf};

/// Result type alias for extractor operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for extractor operations.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional source error.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Create a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// Create a new error with the given kind and source.
    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    /// An I/O failure on `path`.
    pub(crate) fn io(path: &Path, err: std::io::Error) -> Self {
        Self::with_source(
            ErrorKind::Io {
                path: path.to_path_buf(),
                message: err.to_string(),
            },
            err,
        )
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// A file or directory could not be read or written.
    #[error("IO error on {}: {message}", path.display())]
    Io { path: PathBuf, message: String },

    /// A source file is not valid UTF-8.
    #[error("{} is not valid UTF-8", path.display())]
    Decode { path: PathBuf },

    /// CSV serialization failed.
    #[error("CSV error: {0}")]
    Csv(String),

    /// A matcher pattern failed to compile.
    #[error("Invalid pattern for rule '{rule}': {message}")]
    Pattern { rule: &'static str, message: String },
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::with_source(ErrorKind::Csv(err.to_string()), err)
    }
}
