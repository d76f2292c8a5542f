//! Library Error Types
//!
//! Errors here are operational: the library root could not be walked, a book
//! directory could not be listed, or a link could not be made. Malformed or
//! incomplete metadata is never an error; such books are skipped.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A library error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The library root could not be walked.
    #[display("could not scan library at {}", _0.display())]
    Scan(#[error(not(source))] PathBuf),
    /// A book directory could not be listed while looking for its book file.
    #[display("could not list book files in {}", _0.display())]
    Source(#[error(not(source))] PathBuf),
    #[display("issue with mirror path generation")]
    Template,
    /// The link for the book described by this descriptor failed.
    #[display("could not mirror book described by {}", _0.display())]
    Link(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Scan(_) | Self::Source(_) | Self::Link(_))
    }
}
