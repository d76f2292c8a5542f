pub mod error;
pub mod link;
mod name;
mod path;

pub use crate::link::{LinkOutcome, Linker, LocalLinker};
pub use crate::name::{MAX_NAME_BYTES, REPLACEMENT, file_name, normalize_extension, sanitize as sanitize_name};
pub use crate::path::resolve_under;
