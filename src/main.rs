//! `calmirror`: mirror a subset of a Calibre library as hard links.

use calmirror_config::Loader;
use calmirror_library::{Context, mirror};
use calmirror_storage::LocalLinker;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Mirror the books of an external collection out of a Calibre library.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Configuration file (defaults to the platform config directory).
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Only report what would be linked, whatever the configuration says.
    #[arg(long)]
    dry_run: bool,
    /// More logging (repeatable).
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,
    /// Only log warnings and errors.
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    fn level(&self) -> Level {
        match (self.quiet, self.verbose) {
            (true, _) => Level::WARN,
            (false, 0) => Level::INFO,
            (false, 1) => Level::DEBUG,
            (false, _) => Level::TRACE,
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::builder().with_default_directive(args.level().into()).from_env_lossy())
        .init();

    let Some(path) = args.config.clone().or_else(calmirror_config::default_path) else {
        tracing::error!("No --config given and no platform configuration directory found");
        return ExitCode::FAILURE;
    };
    let records = match Loader::new().load(&path) {
        Ok(records) => records,
        Err(e) => {
            tracing::error!("{e:?}");
            return ExitCode::FAILURE;
        },
    };
    if records.is_empty() {
        tracing::warn!("Configuration holds no records; nothing to do");
    }

    let mut failed = 0;
    for (index, mut config) in records.into_iter().enumerate() {
        config.dry_run |= args.dry_run;
        let span = tracing::info_span!("record", index = index + 1, collection = %config.ext_lib_name);
        let _guard = span.enter();
        if let Err(e) = mirror(&LocalLinker, &Context::new(config)) {
            tracing::error!("{e:?}");
            failed += 1;
        }
    }
    match failed {
        0 => ExitCode::SUCCESS,
        _ => {
            tracing::error!(failed, "Some configuration records failed");
            ExitCode::FAILURE
        },
    }
}
