mod collections;
mod metadata;
mod series;

pub use self::collections::Collections;
pub use self::metadata::Metadata;
pub use self::series::SeriesIndex;

/// Trims a raw field value, treating whitespace-only values as absent.
pub(crate) fn non_empty(s: &str) -> Option<&str> {
    let s = s.trim();
    (!s.is_empty()).then_some(s)
}
