use super::SeriesIndex;
use crate::document::OpfDocument;

/// The bibliographic fields that drive mirror layout.
///
/// Every field is independently optional; Calibre happily writes records with
/// a series but no index, or an index for a book that has no series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    /// Book title (`<dc:title>`)
    pub title: Option<String>,
    /// Series name (`calibre:series`)
    pub series: Option<String>,
    /// Position within the series (`calibre:series_index`)
    pub series_index: Option<SeriesIndex>,
    /// Primary author (`<dc:creator>`)
    pub author: Option<String>,
}

impl From<&OpfDocument> for Metadata {
    fn from(document: &OpfDocument) -> Self {
        Self {
            title: document.title().map(str::to_string),
            series: document.series().map(str::to_string),
            series_index: document.series_index(),
            author: document.author().map(str::to_string),
        }
    }
}

impl Metadata {
    /// Metadata for a descriptor that may have failed to parse. A failed
    /// parse yields no fields at all.
    pub fn from_parsed<E>(document: Result<&OpfDocument, E>) -> Self {
        document.map(Self::from).unwrap_or_default()
    }
}
