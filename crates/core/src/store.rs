//! Pattern files on disk: one value per line, written back atomically

use std::io::Write as _;
use std::path::Path;

use color_eyre::Result;
use tempfile::NamedTempFile;

use crate::pattern::{PatternKind, PatternSet};

/// Load a pattern set named after `path`.
///
/// A missing file yields an empty set, so learning can create it.
///
/// # Errors
/// Returns an error if the file exists but is not readable UTF-8 text.
pub fn load(path: &Path, kind: PatternKind) -> Result<PatternSet> {
    let lines = if path.is_file() {
        read_lines(path)?
    } else {
        Vec::new()
    };
    Ok(PatternSet::new(path.to_string_lossy(), kind, lines))
}

/// Load a pattern set only if `path` is an existing file
///
/// # Errors
/// Returns an error if the file exists but is not readable UTF-8 text.
pub fn load_existing(path: &Path, kind: PatternKind) -> Result<Option<PatternSet>> {
    if !path.is_file() {
        return Ok(None);
    }
    let lines = read_lines(path)?;
    Ok(Some(PatternSet::new(path.to_string_lossy(), kind, lines)))
}

fn read_lines(path: &Path) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)?;
    Ok(contents.lines().map(str::to_string).collect())
}

/// Replace the set's file with its sorted values, one per line.
///
/// Writes to a temporary file in the same directory and renames it into
/// place, so a crash never leaves a truncated pattern file.
///
/// # Errors
/// Returns an error if the temporary file cannot be written or renamed.
pub fn save(set: &PatternSet) -> Result<()> {
    let path = Path::new(set.name());
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    let mut temp_file = NamedTempFile::new_in(dir)?;
    temp_file.write_all(set.all_values().join("\n").as_bytes())?;
    temp_file.as_file().sync_all()?;
    temp_file.persist(path)?;
    Ok(())
}
