//! Extraction Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.
//!
//! Only a document that cannot be read at all is an error. Missing fields and
//! unparsable membership payloads are expected in real libraries and are
//! represented as absent values instead.

use derive_more::{Display, Error};

/// An extraction error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The descriptor contained nothing but whitespace.
    #[display("empty descriptor")]
    Empty,
    /// The XML structure is too broken to process.
    #[display("malformed XML: {_0}")]
    MalformedXml(#[error(not(source))] String),
    /// The document is well-formed so far, but has no root element.
    #[display("descriptor has no root element")]
    MissingRoot,
    /// A field was found but could not be parsed.
    #[display("failed to parse field '{field}', found value: {value}")]
    ParseError {
        /// The field that failed to parse.
        field: &'static str,
        /// The offending value.
        value: String,
    },
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // The descriptor is either valid XML or it's not.
        false
    }
}
