//! Cargo-style status output for rmfile
//!
//! ```text
//!     Removing /tmp/downloads/setup.exe
//!      Learned 2 values for patterns/sha1.txt
//!              2aae6c35c94fcfb415dbe95f408b9ce91ee846ed
//!              da39a3ee5e6b4b0d3255bfef95601890afd80709
//!     Finished 1 removed, 0 failed in 12ms
//! ```

use std::io::Write as _;
use std::path::Path;
use std::time::Instant;

use rmfile_core::PatternSet;

/// Status verbs for cargo-style output (right-aligned to 12 chars)
struct Status;

impl Status {
    const REMOVING: &str = "Removing";
    const MATCHED: &str = "Matched";
    const LEARNED: &str = "Learned";
    const FINISHED: &str = "Finished";
}

const STATUS_WIDTH: usize = 12;

/// Print a cargo-style status line
fn print_status(status: &str, message: &str, style: &console::Style) {
    let mut term = console::Term::stderr();
    let _ = writeln!(term, "{:>STATUS_WIDTH$} {}", style.apply_to(status), message);
}

fn green() -> console::Style {
    console::Style::new().green().bold()
}

/// Tracks one run and prints its progress
pub struct RunReport {
    start: Instant,
    dry_run: bool,
}

impl RunReport {
    pub fn new(dry_run: bool) -> Self {
        Self {
            start: Instant::now(),
            dry_run,
        }
    }

    /// A file matched; in dry-run mode it is only reported
    pub fn removing(&self, path: &Path) {
        let status = if self.dry_run {
            Status::MATCHED
        } else {
            Status::REMOVING
        };
        print_status(status, &path.display().to_string(), &green());
    }

    /// List the values a pattern set picked up
    pub fn learned(&self, set: &PatternSet) {
        let rows: Vec<&str> = set.observed().collect();
        let noun = if rows.len() == 1 { "value" } else { "values" };
        print_status(
            Status::LEARNED,
            &format!("{} new {noun} for {}", rows.len(), set.name()),
            &green(),
        );

        let mut term = console::Term::stderr();
        for row in rows {
            let _ = writeln!(term, "{:>STATUS_WIDTH$} {row}", "");
        }
    }

    /// Show final summary
    pub fn finish(&self, verb: &str, done: usize, failed: usize) {
        let elapsed = self.start.elapsed();
        let elapsed_str = if elapsed.as_secs() >= 1 {
            format!("{:.2}s", elapsed.as_secs_f64())
        } else {
            format!("{}ms", elapsed.as_millis())
        };
        let dry_run = if self.dry_run { " (dry run)" } else { "" };

        let style = if failed == 0 {
            green()
        } else {
            console::Style::new().yellow().bold()
        };
        print_status(
            Status::FINISHED,
            &format!("{done} {verb}, {failed} failed in {elapsed_str}{dry_run}"),
            &style,
        );
    }
}
