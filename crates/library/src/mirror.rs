//! The mirror pipeline.
//!
//! For every descriptor in the library: parse it, check collection
//! membership, work out the destination, find the book file, and link it.
//! Books that can't or shouldn't be mirrored are skipped with a
//! [`SkipReason`]; only filesystem failures are errors.

use crate::Context;
use crate::error::{ErrorKind, Result};
use crate::scan;
use calmirror_extract::error::ErrorKind as ExtractErrorKind;
use calmirror_extract::models::Metadata;
use calmirror_storage::{LinkOutcome, Linker};
use exn::ResultExt;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::Path;
use tracing::instrument;

/// Why a book was left out of the mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SkipReason {
    /// The descriptor could not be read or is not well-formed XML.
    Unparsable,
    /// The book is not in the configured external collection.
    NotMember,
    /// The book has no title to name it by.
    Untitled,
    /// No file in the book's directory has the configured source format.
    NoSource,
}
impl Display for SkipReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(match self {
            Self::Unparsable => "unparsable descriptor",
            Self::NotMember => "not in collection",
            Self::Untitled => "no title",
            Self::NoSource => "no source file",
        })
    }
}

/// What happened to a single book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Linked(LinkOutcome),
    Skipped(SkipReason),
}

/// Tally of a mirror run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    /// Descriptors found in the library.
    pub discovered: usize,
    /// Links created.
    pub created: usize,
    /// Destinations that already existed.
    pub existing: usize,
    /// Links that would have been created (dry run).
    pub reported: usize,
    pub skipped: BTreeMap<SkipReason, usize>,
}
impl Report {
    pub fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Linked(LinkOutcome::Created(_)) => self.created += 1,
            Outcome::Linked(LinkOutcome::Exists(_)) => self.existing += 1,
            Outcome::Linked(LinkOutcome::Reported(_)) => self.reported += 1,
            Outcome::Skipped(reason) => *self.skipped.entry(*reason).or_default() += 1,
        }
    }

    pub fn skipped(&self, reason: SkipReason) -> usize {
        self.skipped.get(&reason).copied().unwrap_or_default()
    }

    pub fn total_skipped(&self) -> usize {
        self.skipped.values().sum()
    }
}

/// Mirrors the single book described by `descriptor`.
///
/// Membership is checked before anything else about the book is looked at,
/// so books outside the collection never touch the mirror.
#[instrument(skip_all, fields(descriptor = %descriptor.display()))]
pub fn mirror_book(linker: &dyn Linker, ctx: &Context, descriptor: &Path) -> Result<Outcome> {
    let bytes = match std::fs::read(descriptor) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(error = %e, "Could not read descriptor; skipping");
            return Ok(Outcome::Skipped(SkipReason::Unparsable));
        },
    };
    let document = match calmirror_extract::extract(bytes) {
        Ok(document) => document,
        Err(e) => {
            let reason: &ExtractErrorKind = &e;
            tracing::info!(error = %reason, "Could not parse descriptor; skipping");
            return Ok(Outcome::Skipped(SkipReason::Unparsable));
        },
    };

    let config = &ctx.config;
    if !document.collections(&config.ext_lib_column).contains(&config.ext_lib_name) {
        tracing::debug!(collection = %config.ext_lib_name, "Not in collection; skipping");
        return Ok(Outcome::Skipped(SkipReason::NotMember));
    }

    let metadata = Metadata::from(&document);
    let Some(destination) = ctx.generator.generate(&metadata)? else {
        tracing::info!("No title; skipping");
        return Ok(Outcome::Skipped(SkipReason::Untitled));
    };
    let Some(source) = scan::select_source(descriptor, &config.source_format)? else {
        tracing::info!(format = %config.source_format, "No book file in source format; skipping");
        return Ok(Outcome::Skipped(SkipReason::NoSource));
    };

    let outcome = linker
        .ensure_link(&source, &destination, config.dry_run)
        .or_raise(|| ErrorKind::Link(descriptor.to_path_buf()))?;
    match &outcome {
        LinkOutcome::Created(path) => tracing::info!(source = %source.display(), destination = %path.display(), "Linked"),
        LinkOutcome::Exists(path) => tracing::info!(destination = %path.display(), "Already mirrored"),
        LinkOutcome::Reported(path) => {
            tracing::info!(source = %source.display(), destination = %path.display(), "Would link (dry run)")
        },
    }
    Ok(Outcome::Linked(outcome))
}

/// Mirrors every book in the configured library.
///
/// Books are processed in descriptor path order. The first filesystem error
/// stops the run; everything linked before it stays linked, and running again
/// picks up where it left off.
#[instrument(skip_all, fields(library = %ctx.config.library_path.display(), mirror = %ctx.config.mirror_path.display()))]
pub fn mirror(linker: &dyn Linker, ctx: &Context) -> Result<Report> {
    let descriptors = scan::descriptors(&ctx.config.library_path)?;
    let mut report = Report {
        discovered: descriptors.len(),
        ..Report::default()
    };
    for descriptor in &descriptors {
        let outcome = mirror_book(linker, ctx, descriptor)?;
        report.record(&outcome);
    }
    tracing::info!(
        discovered = report.discovered,
        created = report.created,
        existing = report.existing,
        reported = report.reported,
        skipped = report.total_skipped(),
        dry_run = ctx.config.dry_run,
        "Mirror run complete"
    );
    Ok(report)
}
