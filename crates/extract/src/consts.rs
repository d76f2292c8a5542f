/// File name of the per-book descriptor that Calibre writes next to each book.
pub const DESCRIPTOR_FILENAME: &str = "metadata.opf";

/// Dublin Core elements namespace, home of `<dc:title>` and `<dc:creator>`.
pub(crate) const DC_NAMESPACE: &str = "http://purl.org/dc/elements/1.1/";
pub(crate) const DC_TITLE: &str = "title";
pub(crate) const DC_CREATOR: &str = "creator";

pub(crate) const META_SERIES: &str = "calibre:series";
pub(crate) const META_SERIES_INDEX: &str = "calibre:series_index";
/// Custom columns are stored as `calibre:user_metadata:<column>`.
pub(crate) const META_USER_METADATA_PREFIX: &str = "calibre:user_metadata:";

/// Lookup key of the custom column listing the external libraries a book is shared with.
pub const DEFAULT_COLLECTION_COLUMN: &str = "#ext_library";
