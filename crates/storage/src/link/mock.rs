//! In-memory linker for testing.

use super::{LinkOutcome, Linker};
use crate::error::{ErrorKind, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// In-memory linker for testing.
///
/// Records `destination → source` pairs instead of touching disk. Paths can
/// be pre-seeded as already existing, and destinations below a denied prefix
/// fail with [`ErrorKind::PermissionDenied`] to exercise error propagation.
///
/// # Examples
///
/// ```
/// use calmirror_storage::link::{LinkOutcome, Linker, MockLinker};
/// use std::path::Path;
///
/// let linker = MockLinker::with_existing(["/mirror/taken.epub"]);
/// let outcome = linker.ensure_link(Path::new("/lib/a.epub"), Path::new("/mirror/taken.epub"), false).unwrap();
/// assert!(matches!(outcome, LinkOutcome::Exists(_)));
/// ```
#[derive(Default)]
pub struct MockLinker {
    links: Mutex<BTreeMap<PathBuf, PathBuf>>,
    existing: BTreeSet<PathBuf>,
    denied: Vec<PathBuf>,
}

impl MockLinker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock linker where the given destinations already exist.
    pub fn with_existing(paths: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            existing: paths.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Refuse to link anything below `prefix`.
    pub fn deny(mut self, prefix: impl Into<PathBuf>) -> Self {
        self.denied.push(prefix.into());
        self
    }

    /// Snapshot of every link created so far, keyed by destination.
    pub fn links(&self) -> BTreeMap<PathBuf, PathBuf> {
        // A poisoned lock only means another test thread panicked mid-insert.
        self.links.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Linker for MockLinker {
    fn ensure_link(&self, source: &Path, destination: &Path, dry_run: bool) -> Result<LinkOutcome> {
        let mut links = self.links.lock().unwrap_or_else(|e| e.into_inner());
        if self.existing.contains(destination) || links.contains_key(destination) {
            return Ok(LinkOutcome::Exists(destination.to_path_buf()));
        }
        if dry_run {
            return Ok(LinkOutcome::Reported(destination.to_path_buf()));
        }
        if self.denied.iter().any(|prefix| destination.starts_with(prefix)) {
            exn::bail!(ErrorKind::PermissionDenied(destination.to_path_buf()));
        }
        links.insert(destination.to_path_buf(), source.to_path_buf());
        Ok(LinkOutcome::Created(destination.to_path_buf()))
    }
}
