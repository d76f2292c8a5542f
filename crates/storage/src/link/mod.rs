//! Link materialization.
//!
//! A [`Linker`] turns a (source file, destination path) pair into a hard link
//! inside the mirror. The contract is deliberately narrow so that the
//! pipeline can be tested against [`MockLinker`] without touching disk:
//!
//! - Parent directories of the destination are created as needed.
//! - An existing destination is never overwritten; it is reported as
//!   [`LinkOutcome::Exists`], in dry-run mode too.
//! - In dry-run mode nothing on disk changes.

mod local;
#[cfg(feature = "mock")]
mod mock;

pub use self::local::LocalLinker;
#[cfg(feature = "mock")]
pub use self::mock::MockLinker;
use crate::error::Result;
use std::path::{Path, PathBuf};

/// The outcome of (successfully) ensuring a single link.
///
/// Each variant carries the destination path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    /// A new hard link was created.
    Created(PathBuf),
    /// Something already exists at the destination; nothing was written.
    Exists(PathBuf),
    /// Dry-run: the link would have been created.
    Reported(PathBuf),
}
impl LinkOutcome {
    pub fn path(&self) -> &Path {
        match self {
            Self::Created(p) | Self::Exists(p) | Self::Reported(p) => p,
        }
    }
}

/// Creates hard links into the mirror.
pub trait Linker {
    /// Ensures `destination` is a hard link to `source`, honouring `dry_run`.
    ///
    /// # Errors
    /// Filesystem failures (permissions, missing source, uncreatable parent
    /// directories) are returned as-is; they are operational problems the
    /// operator needs to see.
    fn ensure_link(&self, source: &Path, destination: &Path, dry_run: bool) -> Result<LinkOutcome>;
}
