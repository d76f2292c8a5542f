//! Path validation for locations inside the mirror.
//!
//! Every path the mirror writes to is built from a trusted root plus a
//! relative part derived from book metadata. The relative part must stay
//! strictly below the root.

use std::path::{Component, Path, PathBuf};

use crate::error::{ErrorKind, Result};

/// Validates a mirror-relative path and joins it onto `root`.
///
/// The relative part may only consist of normal components: no root, no
/// drive prefix, no `..` (even one that would resolve inside the root), no
/// null bytes, and at least one component. `.` components are dropped.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use calmirror_storage::resolve_under;
/// assert_eq!(
///     resolve_under("/mirror", "Series/1 - Title.epub").unwrap(),
///     Path::new("/mirror/Series/1 - Title.epub")
/// );
/// assert!(resolve_under("/mirror", "../etc/passwd").is_err());
/// assert!(resolve_under("/mirror", "/etc/passwd").is_err());
/// ```
pub fn resolve_under(root: impl AsRef<Path>, relative: impl AsRef<Path>) -> Result<PathBuf> {
    let relative = relative.as_ref();
    let invalid = || ErrorKind::InvalidPath(relative.to_path_buf());
    let mut resolved = root.as_ref().to_path_buf();
    let mut depth = 0usize;
    for component in relative.components() {
        match component {
            Component::Normal(name) => {
                // Null bytes pass through Path::components() on Unix but cause
                // truncation in C-based syscalls.
                if name.as_encoded_bytes().contains(&0) {
                    exn::bail!(invalid());
                }
                resolved.push(name);
                depth += 1;
            },
            Component::CurDir => {},
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => exn::bail!(invalid()),
        }
    }
    if depth == 0 {
        exn::bail!(invalid());
    }
    Ok(resolved)
}
