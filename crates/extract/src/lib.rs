mod consts;
mod document;
pub mod error;
pub mod models;

use tracing::instrument;

pub use crate::consts::{DEFAULT_COLLECTION_COLUMN, DESCRIPTOR_FILENAME};
pub use crate::document::OpfDocument;
use crate::error::Result;

/// Easy, top-level entrypoint for parsing a descriptor from raw bytes.
///
/// Accepts raw bytes, instead of requiring the descriptor to be valid UTF-8.
/// Invalid byte sequences are replaced with U+FFFD before parsing. See
/// [`OpfDocument`] for the available queries.
#[instrument(skip(opf), fields(opf_size = opf.as_ref().len()))]
pub fn extract(opf: impl AsRef<[u8]>) -> Result<OpfDocument> {
    OpfDocument::parse(&String::from_utf8_lossy(opf.as_ref()))
}
