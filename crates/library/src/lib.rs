//! Mirroring a Calibre library into a hard-linked tree.
//!
//! [`mirror()`] walks a library, keeps the books that belong to an external
//! collection, and links each into the mirror under a path derived from its
//! metadata. The mirror is append-only: nothing in it is ever overwritten or
//! removed, so runs are idempotent.

pub mod error;
pub mod mirror;
pub mod naming;
mod path;
pub mod scan;

pub use crate::mirror::{Outcome, Report, SkipReason, mirror, mirror_book};
pub use crate::path::PathGenerator;

use calmirror_config::MirrorConfig;

/// Everything a mirror run needs besides the [`Linker`](calmirror_storage::Linker).
pub struct Context {
    pub config: MirrorConfig,
    generator: PathGenerator,
}
impl Context {
    pub fn new(config: MirrorConfig) -> Self {
        let generator = PathGenerator::from(&config);
        Self { config, generator }
    }
}
