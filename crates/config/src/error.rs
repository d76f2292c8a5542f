//! Configuration Error Types
//!
//! Every configuration error is fatal: a run never proceeds on a partially
//! understood configuration. Each variant carries enough context to find the
//! offending line or record.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A configuration error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The configuration file does not exist.
    #[display("configuration file not found: {}", _0.display())]
    NotFound(#[error(not(source))] PathBuf),
    /// The configuration file exists but could not be read.
    #[display("could not read configuration file: {}", _0.display())]
    Read(#[error(not(source))] PathBuf),
    /// The file is not valid YAML.
    #[display("invalid YAML in {} at line {line}, column {column}: {message}", path.display())]
    Syntax {
        path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },
    /// A document is valid YAML but not a usable configuration record.
    #[display("invalid configuration record #{index} in {}: {message}", path.display())]
    InvalidRecord {
        path: PathBuf,
        /// One-based position of the record within the file.
        index: usize,
        message: String,
    },
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Read(_))
    }
}
