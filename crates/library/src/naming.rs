//! Mirror layout rules.
//!
//! Each [`NamingMode`] maps a book's [`Metadata`] to a list of directory
//! names and a file stem. Names are returned raw; sanitizing them into path
//! components is left to [`PathGenerator`](crate::PathGenerator).
//!
//! | Mode                      | Directories                                          | Stem                       |
//! |---------------------------|------------------------------------------------------|----------------------------|
//! | `GroupedBySeries`         | `[series or title]`                                  | `index - title`, or `title` |
//! | `AuthorFirst`             | `[author, series or title]`                          | as above                   |
//! | `AuthorSeriesHierarchy`   | `[author, series, index - title]`, or `[author, title]` | as above                |
//!
//! The `index - title` stem is only used when the book has both a series and a
//! series index. A missing author becomes [`UNKNOWN_AUTHOR`].

use calmirror_config::NamingMode;
use calmirror_extract::models::Metadata;

/// Author directory for books without a `<dc:creator>`.
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

/// Where a book goes, relative to the mirror root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Directory names, outermost first.
    pub directories: Vec<String>,
    /// File name without extension.
    pub stem: String,
}

/// Lays out a book under `mode`.
///
/// Returns `None` when the book has no title: there is nothing to name it by.
pub fn layout(metadata: &Metadata, mode: NamingMode) -> Option<Layout> {
    let title = present(&metadata.title)?;
    let series = present(&metadata.series);
    let numbered = match (series, &metadata.series_index) {
        (Some(_), Some(index)) => Some(format!("{index} - {title}")),
        _ => None,
    };
    let author = present(&metadata.author).unwrap_or(UNKNOWN_AUTHOR);
    let group = series.unwrap_or(title);

    let directories = match mode {
        NamingMode::GroupedBySeries => vec![group.to_string()],
        NamingMode::AuthorFirst => vec![author.to_string(), group.to_string()],
        NamingMode::AuthorSeriesHierarchy => match (series, &numbered) {
            (Some(series), Some(numbered)) => vec![author.to_string(), series.to_string(), numbered.clone()],
            _ => vec![author.to_string(), title.to_string()],
        },
    };
    Some(Layout {
        directories,
        stem: numbered.unwrap_or_else(|| title.to_string()),
    })
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.trim().is_empty())
}
