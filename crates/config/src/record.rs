use calmirror_extract::DEFAULT_COLLECTION_COLUMN;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How books are laid out inside the mirror.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingMode {
    /// `<series or title>/<index - title>.ext`
    #[default]
    #[serde(alias = "grouped-by-series", alias = "series")]
    GroupedBySeries,
    /// `<author>/<series or title>/<index - title>.ext`
    #[serde(alias = "author-first")]
    AuthorFirst,
    /// `<author>/<series>/<index - title>/<index - title>.ext`, or
    /// `<author>/<title>/<title>.ext` for books outside a series.
    #[serde(alias = "author-series-hierarchy")]
    AuthorSeriesHierarchy,
}

/// One fully resolved configuration record; each record is one mirror run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorConfig {
    /// Root of the Calibre library to scan.
    pub library_path: PathBuf,
    /// Name of the external collection a book must belong to.
    pub ext_lib_name: String,
    /// Root of the mirror tree.
    pub mirror_path: PathBuf,
    /// Report intended links without touching the filesystem.
    pub dry_run: bool,
    /// Extension of the book file to link, e.g. `.epub` or `.kepub.epub`.
    pub source_format: String,
    /// Extension given to links in the mirror.
    pub dest_format: String,
    pub naming_mode: NamingMode,
    /// Calibre custom column holding collection membership.
    pub ext_lib_column: String,
}

/// Values used for any key a record (or the environment) leaves out.
#[derive(Debug, Serialize)]
pub(crate) struct Defaults {
    dry_run: bool,
    source_format: &'static str,
    dest_format: &'static str,
    ext_lib_column: &'static str,
}
impl Default for Defaults {
    fn default() -> Self {
        Self {
            // Nothing is written unless a record opts in.
            dry_run: true,
            source_format: ".epub",
            dest_format: ".epub",
            ext_lib_column: DEFAULT_COLLECTION_COLUMN,
        }
    }
}

/// A record exactly as merged from the configuration layers, before the
/// legacy `author_first` flag has been folded into the naming mode.
#[derive(Debug, Deserialize)]
pub(crate) struct RawRecord {
    library_path: PathBuf,
    ext_lib_name: String,
    mirror_path: PathBuf,
    dry_run: bool,
    source_format: String,
    dest_format: String,
    ext_lib_column: String,
    naming_mode: Option<NamingMode>,
    #[serde(default)]
    author_first: bool,
}

impl RawRecord {
    /// Resolves the naming mode and checks the values serde can't.
    pub(crate) fn validate(self) -> Result<MirrorConfig, String> {
        if !self.library_path.is_absolute() {
            return Err(format!("library_path must be absolute, got `{}`", self.library_path.display()));
        }
        if !self.mirror_path.is_absolute() {
            return Err(format!("mirror_path must be absolute, got `{}`", self.mirror_path.display()));
        }
        if self.mirror_path.starts_with(&self.library_path) {
            // The scanner would otherwise walk into the mirror on the next run.
            return Err("mirror_path must not be inside library_path".to_string());
        }
        if self.ext_lib_name.trim().is_empty() {
            return Err("ext_lib_name must not be empty".to_string());
        }
        if self.source_format.trim().trim_matches('.').is_empty() {
            return Err("source_format must not be empty".to_string());
        }
        let naming_mode = match (self.naming_mode, self.author_first) {
            (Some(mode), _) => mode,
            (None, true) => NamingMode::AuthorFirst,
            (None, false) => NamingMode::GroupedBySeries,
        };
        Ok(MirrorConfig {
            library_path: self.library_path,
            ext_lib_name: self.ext_lib_name,
            mirror_path: self.mirror_path,
            dry_run: self.dry_run,
            source_format: self.source_format,
            dest_format: self.dest_format,
            naming_mode,
            ext_lib_column: self.ext_lib_column,
        })
    }
}
