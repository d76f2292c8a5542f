//! Mirror path generation.
//!
//! Turns a book's [`Metadata`] into an absolute destination path inside the
//! mirror, using the [`layout`](crate::naming::layout) for the configured
//! [`NamingMode`]. Every directory name and the file stem are sanitized
//! individually, so metadata can never add, remove or escape path components:
//! a series named `Fantasy/Epic` is one directory, `Fantasy_Epic`.
//!
//! ```
//! use calmirror_config::NamingMode;
//! use calmirror_extract::models::Metadata;
//! use calmirror_library::PathGenerator;
//! use std::path::Path;
//!
//! let generator = PathGenerator::new("/srv/mirror", ".epub", NamingMode::GroupedBySeries);
//! let book = Metadata {
//!     title: Some("The Great Adventure".into()),
//!     series: Some("Fantasy Series".into()),
//!     series_index: Some("1".parse().unwrap()),
//!     author: None,
//! };
//! let path = generator.generate(&book).unwrap().unwrap();
//! assert_eq!(path, Path::new("/srv/mirror/Fantasy Series/1 - The Great Adventure.epub"));
//! ```

use crate::error::{ErrorKind, Result};
use crate::naming;
use calmirror_config::{MirrorConfig, NamingMode};
use calmirror_extract::models::Metadata;
use calmirror_storage::{file_name, resolve_under, sanitize_name};
use exn::ResultExt;
use std::path::PathBuf;
use tracing::instrument;

/// Generates deterministic destination paths below a mirror root.
#[derive(Debug, Clone)]
pub struct PathGenerator {
    root: PathBuf,
    extension: String,
    mode: NamingMode,
}

impl From<&MirrorConfig> for PathGenerator {
    fn from(config: &MirrorConfig) -> Self {
        Self::new(&config.mirror_path, &config.dest_format, config.naming_mode)
    }
}

impl PathGenerator {
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>, mode: NamingMode) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
            mode,
        }
    }

    /// Destination of the book described by `metadata`, or `None` if the
    /// book has no title.
    ///
    /// The same metadata always produces the same path.
    #[instrument(skip_all, fields(title = metadata.title.as_deref()))]
    pub fn generate(&self, metadata: &Metadata) -> Result<Option<PathBuf>> {
        let Some(layout) = naming::layout(metadata, self.mode) else {
            return Ok(None);
        };
        let relative: PathBuf = layout
            .directories
            .iter()
            .map(|directory| sanitize_name(directory))
            .chain(std::iter::once(file_name(&layout.stem, &self.extension)))
            .collect();
        let path = resolve_under(&self.root, &relative).or_raise(|| ErrorKind::Template)?;
        Ok(Some(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::path::Path;

    const MIRROR: &str = "/test/mirror";

    fn metadata(title: Option<&str>, series: Option<&str>, index: Option<&str>, author: Option<&str>) -> Metadata {
        Metadata {
            title: title.map(str::to_string),
            series: series.map(str::to_string),
            series_index: index.map(|i| i.parse().unwrap()),
            author: author.map(str::to_string),
        }
    }

    fn generate(mode: NamingMode, book: &Metadata) -> Option<PathBuf> {
        PathGenerator::new(MIRROR, ".epub", mode).generate(book).unwrap()
    }

    #[rstest]
    #[case("The Great Adventure", Some("Fantasy Series"), Some("1"), "Fantasy Series/1 - The Great Adventure.epub")]
    #[case("The Great Adventure", None, None, "The Great Adventure/The Great Adventure.epub")]
    #[case("The Great Adventure", Some(""), Some("0"), "The Great Adventure/The Great Adventure.epub")]
    #[case("The Great Adventure", None, Some("0"), "The Great Adventure/The Great Adventure.epub")]
    #[case("The Great Adventure", Some("Fantasy Series"), None, "Fantasy Series/The Great Adventure.epub")]
    #[case("The Great Adventure", Some("Fantasy Series"), Some("0"), "Fantasy Series/0 - The Great Adventure.epub")]
    #[case("The Great Adventure", Some("Fantasy Series"), Some("1.5"), "Fantasy Series/1.5 - The Great Adventure.epub")]
    #[case("The Great Adventure", Some("Fantasy Series"), Some("0.5"), "Fantasy Series/0.5 - The Great Adventure.epub")]
    #[case("The Great Adventure", Some("Fantasy Series"), Some("10.25"), "Fantasy Series/10.25 - The Great Adventure.epub")]
    #[case("The Great Adventure", Some("Fantasy Series"), Some("1.0"), "Fantasy Series/1.0 - The Great Adventure.epub")]
    #[case(
        "The Great Adventure",
        Some(r#"Fantasy/Series with \:*?"<>|"#),
        None,
        "Fantasy_Series with ________/The Great Adventure.epub"
    )]
    #[case("📚 The Great Adventure 📚", Some("作者名 Series"), Some("1"), "作者名 Series/1 - 📚 The Great Adventure 📚.epub")]
    #[case("Why?", Some("Series:"), Some("2"), "Series_/2 - Why_.epub")]
    fn test_grouped_by_series(
        #[case] title: &str,
        #[case] series: Option<&str>,
        #[case] index: Option<&str>,
        #[case] expected: &str,
    ) {
        let book = metadata(Some(title), series, index, None);
        let path = generate(NamingMode::GroupedBySeries, &book).unwrap();
        assert_eq!(path, Path::new(MIRROR).join(expected));
    }

    #[rstest]
    #[case(Some("Test Author"), Some("Fantasy Series"), Some("1"), "Test Author/Fantasy Series/1 - The Great Adventure.epub")]
    #[case(Some("Test Author"), None, None, "Test Author/The Great Adventure/The Great Adventure.epub")]
    #[case(None, Some("Fantasy Series"), Some("1"), "Unknown Author/Fantasy Series/1 - The Great Adventure.epub")]
    #[case(Some("Author/Name"), Some("Series/Name"), None, "Author_Name/Series_Name/The Great Adventure.epub")]
    fn test_author_first(
        #[case] author: Option<&str>,
        #[case] series: Option<&str>,
        #[case] index: Option<&str>,
        #[case] expected: &str,
    ) {
        let book = metadata(Some("The Great Adventure"), series, index, author);
        let path = generate(NamingMode::AuthorFirst, &book).unwrap();
        assert_eq!(path, Path::new(MIRROR).join(expected));
    }

    #[rstest]
    #[case(Some("Test Author"), Some("Saga"), Some("1"), "Test Author/Saga/1 - X/1 - X.epub")]
    #[case(None, Some("Saga"), Some("1"), "Unknown Author/Saga/1 - X/1 - X.epub")]
    #[case(Some("Test Author"), Some("Saga"), None, "Test Author/X/X.epub")]
    fn test_author_series_hierarchy(
        #[case] author: Option<&str>,
        #[case] series: Option<&str>,
        #[case] index: Option<&str>,
        #[case] expected: &str,
    ) {
        let book = metadata(Some("X"), series, index, author);
        let path = generate(NamingMode::AuthorSeriesHierarchy, &book).unwrap();
        assert_eq!(path, Path::new(MIRROR).join(expected));
    }

    #[test]
    fn test_untitled_book_has_no_path() {
        let book = metadata(None, Some("Fantasy Series"), Some("1"), Some("Test Author"));
        assert_eq!(generate(NamingMode::GroupedBySeries, &book), None);
    }

    #[test]
    fn test_distinct_indexes_do_not_collide() {
        let paths: Vec<_> = ["1", "1.0", "1.5"]
            .into_iter()
            .map(|index| generate(NamingMode::GroupedBySeries, &metadata(Some("T"), Some("S"), Some(index), None)))
            .collect();
        assert_ne!(paths[0], paths[1]);
        assert_ne!(paths[1], paths[2]);
        assert_ne!(paths[0], paths[2]);
    }

    #[test]
    fn test_generation_is_deterministic() {
        let book = metadata(Some("T"), Some("S"), Some("3"), Some("A"));
        let generator = PathGenerator::new(MIRROR, "epub", NamingMode::AuthorSeriesHierarchy);
        assert_eq!(generator.generate(&book).unwrap(), generator.generate(&book).unwrap());
    }

    #[rstest]
    #[case("..")]
    #[case(".")]
    #[case("../../etc/passwd")]
    fn test_metadata_cannot_escape_the_mirror(#[case] hostile: &str) {
        let book = metadata(Some(hostile), Some(hostile), None, Some(hostile));
        for mode in [NamingMode::GroupedBySeries, NamingMode::AuthorFirst, NamingMode::AuthorSeriesHierarchy] {
            let path = generate(mode, &book).unwrap();
            assert!(path.starts_with(MIRROR), "{}", path.display());
            assert!(path.components().all(|c| c != std::path::Component::ParentDir));
        }
    }

    #[test]
    fn test_dest_format_without_dot() {
        let book = metadata(Some("T"), None, None, None);
        let generator = PathGenerator::new(MIRROR, "kepub.epub", NamingMode::GroupedBySeries);
        assert_eq!(generator.generate(&book).unwrap().unwrap(), Path::new("/test/mirror/T/T.kepub.epub"));
    }
}
