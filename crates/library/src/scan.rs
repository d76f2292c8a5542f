//! Library scanning.
//!
//! Calibre stores each book in its own directory holding a `metadata.opf`
//! descriptor next to one file per format. Scanning finds the descriptors;
//! [`select_source`] then picks the book file to mirror from the same
//! directory.

use crate::error::{ErrorKind, Result};
use calmirror_extract::DESCRIPTOR_FILENAME;
use calmirror_storage::normalize_extension;
use exn::ResultExt;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::instrument;
use walkdir::WalkDir;

/// Every descriptor below `root`, sorted.
///
/// Symbolic links are not followed. Entries that can't be read are logged
/// and skipped; only a root that can't be read at all is an error.
#[instrument(level = "debug", fields(root = %root.display()))]
pub fn descriptors(root: &Path) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(e).or_raise(|| ErrorKind::Scan(root.to_path_buf())),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping unreadable library entry");
                continue;
            },
        };
        if entry.file_type().is_file() && entry.file_name() == OsStr::new(DESCRIPTOR_FILENAME) {
            found.push(entry.into_path());
        }
    }
    found.sort();
    tracing::debug!(count = found.len(), "Scanned library");
    Ok(found)
}

/// The book file next to `descriptor` whose name ends with `format`.
///
/// Extensions match case-insensitively, with or without a leading dot. When
/// several files match, the lexicographically smallest name wins so that
/// repeated runs always pick the same file.
pub fn select_source(descriptor: &Path, format: &str) -> Result<Option<PathBuf>> {
    let Some(directory) = descriptor.parent() else {
        return Ok(None);
    };
    let suffix = normalize_extension(format).to_ascii_lowercase();
    let failed = || ErrorKind::Source(directory.to_path_buf());
    let mut candidates = Vec::new();
    for entry in std::fs::read_dir(directory).or_raise(failed)? {
        let entry = entry.or_raise(failed)?;
        if !entry.file_type().or_raise(failed)?.is_file() {
            continue;
        }
        let name = entry.file_name();
        // Calibre only writes UTF-8 names.
        let Some(name) = name.to_str() else {
            continue;
        };
        if name.len() > suffix.len() && name.to_ascii_lowercase().ends_with(&suffix) {
            candidates.push(entry.path());
        }
    }
    if candidates.len() > 1 {
        tracing::debug!(count = candidates.len(), directory = %directory.display(), "Several book files match; using the first by name");
    }
    Ok(candidates.into_iter().min())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) -> PathBuf {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"").unwrap();
        path
    }

    #[test]
    fn test_finds_descriptors_at_any_depth_sorted() {
        let dir = TempDir::new().unwrap();
        let b = touch(dir.path(), "Zed/Book (2)/metadata.opf");
        let a = touch(dir.path(), "Alice/Book (1)/metadata.opf");
        let top = touch(dir.path(), "metadata.opf");
        touch(dir.path(), "Alice/Book (1)/book.epub");
        touch(dir.path(), "Alice/metadata.opf.bak");
        touch(dir.path(), "Alice/Book (1)/METADATA.OPF.old");
        assert_eq!(descriptors(dir.path()).unwrap(), vec![a, b, top]);
    }

    #[test]
    fn test_empty_library() {
        let dir = TempDir::new().unwrap();
        assert!(descriptors(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("missing");
        let err = descriptors(&root).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Scan(path) if *path == root));
    }

    #[rstest]
    #[case(&["Book - Author.epub"], ".epub", Some("Book - Author.epub"))]
    #[case(&["Book - Author.epub"], "epub", Some("Book - Author.epub"))]
    #[case(&["BOOK.EPUB"], ".epub", Some("BOOK.EPUB"))]
    #[case(&["b.epub", "a.epub", "c.epub"], ".epub", Some("a.epub"))]
    #[case(&["book.kepub.epub", "book.epub"], ".kepub.epub", Some("book.kepub.epub"))]
    #[case(&["book.pdf", "cover.jpg"], ".epub", None)]
    #[case(&[".epub"], ".epub", None)]
    #[case(&["book.cbz"], ".cbz", Some("book.cbz"))]
    fn test_select_source(#[case] files: &[&str], #[case] format: &str, #[case] expected: Option<&str>) {
        let dir = TempDir::new().unwrap();
        let descriptor = touch(dir.path(), "metadata.opf");
        for file in files {
            touch(dir.path(), file);
        }
        let selected = select_source(&descriptor, format).unwrap();
        assert_eq!(selected, expected.map(|name| dir.path().join(name)));
    }

    #[test]
    fn test_select_source_ignores_directories() {
        let dir = TempDir::new().unwrap();
        let descriptor = touch(dir.path(), "metadata.opf");
        fs::create_dir(dir.path().join("a.epub")).unwrap();
        touch(dir.path(), "b.epub");
        assert_eq!(select_source(&descriptor, ".epub").unwrap(), Some(dir.path().join("b.epub")));
    }

    #[test]
    fn test_select_source_from_missing_directory() {
        let dir = TempDir::new().unwrap();
        let descriptor = dir.path().join("gone/metadata.opf");
        let err = select_source(&descriptor, ".epub").unwrap_err();
        assert!(matches!(&*err, ErrorKind::Source(_)));
    }
}
