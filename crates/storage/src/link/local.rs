//! Local filesystem linker.

use super::{LinkOutcome, Linker};
use crate::error::{ErrorKind, Result};
use std::fs;
use std::io::ErrorKind as IoErrorKind;
use std::path::Path;

/// Creates real hard links with [`std::fs::hard_link`].
///
/// Source and destination must live on the same filesystem; the operating
/// system refuses cross-device hard links and that error is surfaced unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalLinker;

impl Linker for LocalLinker {
    fn ensure_link(&self, source: &Path, destination: &Path, dry_run: bool) -> Result<LinkOutcome> {
        match fs::symlink_metadata(destination) {
            Ok(_) => {
                tracing::info!(destination = %destination.display(), "Destination already exists; skipping");
                return Ok(LinkOutcome::Exists(destination.to_path_buf()));
            },
            Err(e) if e.kind() == IoErrorKind::NotFound => {},
            Err(e) => return Err(ErrorKind::from_io(e, destination).into()),
        }
        if dry_run {
            tracing::info!(
                source = %source.display(),
                destination = %destination.display(),
                "Dry run: would create link"
            );
            return Ok(LinkOutcome::Reported(destination.to_path_buf()));
        }
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).map_err(|e| ErrorKind::from_io(e, parent))?;
        }
        match fs::hard_link(source, destination) {
            Ok(()) => {
                tracing::info!(source = %source.display(), destination = %destination.display(), "Created link");
                Ok(LinkOutcome::Created(destination.to_path_buf()))
            },
            // Lost a race with another writer between the check and the link.
            Err(e) if e.kind() == IoErrorKind::AlreadyExists => Ok(LinkOutcome::Exists(destination.to_path_buf())),
            // The parent was just created, so a missing path means a missing source.
            Err(e) => Err(ErrorKind::from_io(e, source).into()),
        }
    }
}
