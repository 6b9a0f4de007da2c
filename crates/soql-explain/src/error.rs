//! Error types for soql-explain.
//!
//! These are the fatal failures of an explain run. A failed explain call
//! for a single row is not an error here: it is recorded in that row.

use std::path::{Path, PathBuf};

/// Result type alias for soql-explain operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for soql-explain operations.
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
    /// A report file could not be read or written.
    #[error("IO error on {}: {message}", path.display())]
    Io { path: PathBuf, message: String },

    /// The input CSV is malformed or the output CSV could not be written.
    #[error("CSV error: {0}")]
    Csv(String),

    /// The input CSV lacks a required column.
    #[error("Input CSV is missing required column '{0}'")]
    MissingColumn(&'static str),

    /// A normalizer pattern failed to compile.
    #[error("Invalid pattern: {0}")]
    Pattern(String),
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::with_source(ErrorKind::Csv(err.to_string()), err)
    }
}

impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Self {
        Error::with_source(ErrorKind::Pattern(err.to_string()), err)
    }
}
