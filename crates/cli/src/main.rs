//! rmfile: remove files by name, SHA-1 or gcid patterns
//!
//! Walks a file or directory and moves every file that satisfies all loaded
//! pattern sets to the trash. With `--add`, learns the patterns of the files
//! instead and writes them back to the pattern files.

mod report;
mod sources;

use std::path::{Path, PathBuf};

use clap::Parser;
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use color_eyre::Result;
use color_eyre::eyre::{Report, bail};
use rmfile_core::{Inspect, MatchEvaluator, PatternKind, Scanner, store};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use crate::report::RunReport;
use crate::sources::PatternSources;

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default())
    .valid(AnsiColor::Green.on_default())
    .invalid(AnsiColor::Red.on_default());

#[derive(Parser)]
#[command(name = "rmfile")]
#[command(version)]
#[command(styles = STYLES)]
#[command(about = "Remove files based on patterns")]
#[command(long_about = r#"
Remove files based on name, SHA-1 or gcid patterns.

A file is removed only when it satisfies every loaded pattern file. Matched
files are moved to the trash, not deleted.

Pattern files hold one value per line. A patterns directory may contain
name.txt, iname.txt, sha1.txt and gcid.txt, plus an optional rmfile.toml.

Examples:
  rmfile ./downloads --sha1 junk.sha1          Trash files with known hashes
  rmfile ./downloads --from-dir ~/.rmfile      Use a patterns directory
  rmfile ./junk --from-dir ~/.rmfile --add     Learn patterns from ./junk
"#)]
struct Cli {
    /// The file or directory to process
    location: PathBuf,

    /// Load name patterns from file
    #[arg(long, value_name = "FILE")]
    name: Option<PathBuf>,

    /// Same as --name, but case-insensitive
    #[arg(long, value_name = "FILE")]
    iname: Option<PathBuf>,

    /// Load SHA-1 patterns from file
    #[arg(long, value_name = "FILE")]
    sha1: Option<PathBuf>,

    /// Load gcid patterns from file
    #[arg(long, value_name = "FILE")]
    gcid: Option<PathBuf>,

    /// Load patterns from a directory (name.txt, iname.txt, sha1.txt, gcid.txt)
    #[arg(long, value_name = "DIR", env = "RMFILE_FROM_DIR")]
    from_dir: Option<PathBuf>,

    /// Report what would happen without trashing or writing anything
    #[arg(long)]
    dry_run: bool,

    /// Add the patterns of the given files to the pattern files
    #[arg(long)]
    add: bool,

    /// Descend into symlinked directories
    #[arg(long)]
    follow_links: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let loaded = PatternSources::default()
        .file(PatternKind::Name, cli.name)
        .file(PatternKind::IName, cli.iname)
        .file(PatternKind::Sha1, cli.sha1)
        .file(PatternKind::Gcid, cli.gcid)
        .from_dir(cli.from_dir)
        .load()?;

    if loaded.sets.is_empty() {
        eprintln!("No pattern input.");
        return Ok(());
    }

    let inspector = loaded.inspector();
    let evaluator = MatchEvaluator::with_inspector(loaded.sets, inspector)?;
    if evaluator.requires_content() {
        debug!("Content patterns loaded, candidate files will be read");
    }

    info!("Scanning {}...", cli.location.display());
    let paths = Scanner::new(&cli.location)
        .follow_links(cli.follow_links)
        .scan()?;
    debug!("Found {} candidate files", paths.len());

    let report = RunReport::new(cli.dry_run);
    if cli.add {
        learn_command(evaluator, &paths, &report, cli.dry_run)?;
    } else {
        remove_command(&evaluator, &paths, &report, cli.dry_run)?;
    }
    Ok(())
}

/// Per-file outcome counts of one command
#[derive(Debug, Default, PartialEq, Eq)]
struct Tally {
    done: usize,
    failed: usize,
}

/// Trash every file that matches all pattern sets
fn remove_command<I: Inspect>(
    evaluator: &MatchEvaluator<I>,
    paths: &[PathBuf],
    report: &RunReport,
    dry_run: bool,
) -> Result<Tally> {
    let mut tally = Tally::default();

    for path in paths {
        match evaluator.matches(path) {
            Ok(false) => {}
            Ok(true) => {
                report.removing(path);
                if dry_run {
                    tally.done += 1;
                } else if let Err(e) = trash::delete(path) {
                    error!("Failed to trash {}: {e}", path.display());
                    tally.failed += 1;
                } else {
                    tally.done += 1;
                }
            }
            Err(e) => {
                report_failure(path, e);
                tally.failed += 1;
            }
        }
    }

    report.finish("removed", tally.done, tally.failed);
    Ok(tally)
}

/// Observe every file, then write back pattern files that gained values
fn learn_command<I: Inspect>(
    mut evaluator: MatchEvaluator<I>,
    paths: &[PathBuf],
    report: &RunReport,
    dry_run: bool,
) -> Result<Tally> {
    let mut tally = Tally::default();

    for path in paths {
        match evaluator.observe(path) {
            Ok(()) => tally.done += 1,
            Err(e) => {
                report_failure(path, e);
                tally.failed += 1;
            }
        }
    }

    let mut write_failures = 0;
    for set in evaluator.into_sets() {
        if !set.has_observed() {
            continue;
        }
        report.learned(&set);
        if dry_run {
            continue;
        }
        if let Err(e) = store::save(&set) {
            error!("Failed to write {}: {e:#}", set.name());
            write_failures += 1;
        }
    }

    report.finish("observed", tally.done, tally.failed);

    if write_failures > 0 {
        bail!("{write_failures} pattern files could not be written");
    }
    Ok(tally)
}

/// Log a per-file failure with its cause chain; the run continues
fn report_failure(path: &Path, e: rmfile_core::MatchError) {
    let e = Report::new(e);
    error!("Skipping {}: {e:#}", path.display());
}
