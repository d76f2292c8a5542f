//! Configuration for mirror runs.
//!
//! A configuration file is YAML holding one or more `---`-separated
//! documents. Each document is an independent record and becomes one run.
//! Records are layered with [figment]:
//!
//! 1. built-in defaults (`dry_run: true`, `.epub` formats, `#ext_library` column),
//! 2. environment variables prefixed `CALMIRROR_` (e.g. `CALMIRROR_LIBRARY_PATH`),
//! 3. the record itself.
//!
//! ```yaml
//! library_path: /srv/calibre/Books
//! ext_lib_name: calibre-web
//! mirror_path: /srv/calibre/web-mirror
//! dry_run: false
//! naming_mode: author_first
//! ---
//! library_path: /srv/calibre/Comics
//! ext_lib_name: calibre-web
//! mirror_path: /srv/calibre/comics-mirror
//! source_format: .cbz
//! dest_format: .cbz
//! ```

pub mod error;
mod record;

use crate::error::{ErrorKind, Result};
use crate::record::{Defaults, RawRecord};
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Serialized};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub use crate::record::{MirrorConfig, NamingMode};

/// Prefix of environment variables that override built-in defaults.
pub const ENV_PREFIX: &str = "CALMIRROR_";

/// Location of the configuration file when none is given explicitly.
pub fn default_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "calmirror").map(|dirs| dirs.config_dir().join("config.yaml"))
}

/// Reads configuration records from YAML.
pub struct Loader {
    env: bool,
}
impl Default for Loader {
    fn default() -> Self {
        Self { env: true }
    }
}
impl Loader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ignore `CALMIRROR_*` environment variables.
    pub fn without_env(mut self) -> Self {
        self.env = false;
        self
    }

    /// Loads every record from the file at `path`.
    ///
    /// A missing file is an error; an empty file yields no records.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Vec<MirrorConfig>> {
        let path = path.as_ref();
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => exn::bail!(ErrorKind::NotFound(path.to_path_buf())),
            Err(e) => return Err(e).or_raise(|| ErrorKind::Read(path.to_path_buf())),
        };
        self.parse(&text, path)
    }

    /// Parses every record in `text`. `source` is only used in error messages.
    pub fn parse(&self, text: &str, source: impl AsRef<Path>) -> Result<Vec<MirrorConfig>> {
        let source = source.as_ref();
        let mut records = Vec::new();
        for document in serde_yaml::Deserializer::from_str(text) {
            let value = serde_yaml::Value::deserialize(document).map_err(|e| {
                let (line, column) = e.location().map_or((0, 0), |l| (l.line(), l.column()));
                ErrorKind::Syntax {
                    path: source.to_path_buf(),
                    line,
                    column,
                    message: e.to_string(),
                }
            })?;
            let index = records.len() + 1;
            let invalid = |message: String| ErrorKind::InvalidRecord {
                path: source.to_path_buf(),
                index,
                message,
            };
            match value {
                // Empty documents (blank files, stray `---`, comment-only files).
                serde_yaml::Value::Null => continue,
                serde_yaml::Value::Mapping(_) => {},
                _ => exn::bail!(invalid("expected a mapping of configuration keys".to_string())),
            }
            let raw: RawRecord = self.figment(value).extract().map_err(|e| invalid(e.to_string()))?;
            let record = raw.validate().map_err(invalid)?;
            tracing::debug!(index, library = %record.library_path.display(), collection = %record.ext_lib_name, "Loaded configuration record");
            records.push(record);
        }
        Ok(records)
    }

    fn figment(&self, record: serde_yaml::Value) -> Figment {
        let figment = Figment::from(Serialized::defaults(Defaults::default()));
        let figment = match self.env {
            true => figment.merge(Env::prefixed(ENV_PREFIX)),
            false => figment,
        };
        figment.merge(Serialized::defaults(record))
    }
}
