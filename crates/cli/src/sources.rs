//! Resolve which pattern files feed a run

use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::Result;
use rmfile_core::{ContentInspector, PatternKind, PatternSet, RmfileConfig, store};
use tracing::debug;

/// Pattern files named on the command line plus an optional patterns directory
#[derive(Debug, Default)]
pub struct PatternSources {
    explicit: Vec<(PatternKind, PathBuf)>,
    from_dir: Option<PathBuf>,
}

/// Pattern sets ready for evaluation, with the directory's settings
pub struct LoadedPatterns {
    pub sets: Vec<PatternSet>,
    pub config: RmfileConfig,
}

impl PatternSources {
    /// Add an explicitly named pattern file
    #[must_use]
    pub fn file(mut self, kind: PatternKind, path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            self.explicit.push((kind, path));
        }
        self
    }

    /// Look for `name.txt`, `iname.txt`, `sha1.txt` and `gcid.txt` in `dir`
    #[must_use]
    pub fn from_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.from_dir = dir;
        self
    }

    /// Load every source.
    ///
    /// Explicit files are always used, empty if they do not exist yet.
    /// Directory files are used only when present.
    ///
    /// # Errors
    /// Returns an error if a pattern file or `rmfile.toml` cannot be read.
    pub fn load(&self) -> Result<LoadedPatterns> {
        let mut sets = Vec::new();
        let mut explicit_files = Vec::new();

        for (kind, path) in &self.explicit {
            let set = store::load(path, *kind)?;
            debug!("Loaded {} {kind} patterns from {}", set.accepted_len(), path.display());
            sets.push(set);
            explicit_files.push(same_file_key(path));
        }

        let config = match &self.from_dir {
            Some(dir) => {
                let config = RmfileConfig::load(dir)?;
                for kind in PatternKind::ALL {
                    let path = dir.join(config.files.file_name(kind));
                    if explicit_files.contains(&same_file_key(&path)) {
                        debug!("Skipping {}, already given explicitly", path.display());
                        continue;
                    }
                    if let Some(set) = store::load_existing(&path, kind)? {
                        debug!(
                            "Loaded {} {kind} patterns from {}",
                            set.accepted_len(),
                            path.display()
                        );
                        sets.push(set);
                    }
                }
                config
            }
            None => RmfileConfig::default(),
        };

        Ok(LoadedPatterns { sets, config })
    }
}

/// Canonical path for files that exist, so `./pat/sha1.txt` and `pat/sha1.txt`
/// compare equal; the path as given otherwise
fn same_file_key(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

impl LoadedPatterns {
    /// Inspector honoring the configured buffer size
    #[must_use]
    pub fn inspector(&self) -> ContentInspector {
        match self.config.buffer_size {
            Some(size) => ContentInspector::with_buffer_size(size),
            None => ContentInspector::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_explicit_missing_file_gives_empty_set() {
        let dir = TempDir::new().unwrap();
        let loaded = PatternSources::default()
            .file(PatternKind::Sha1, Some(dir.path().join("sha1.txt")))
            .file(PatternKind::Gcid, None)
            .load()
            .unwrap();

        assert_eq!(loaded.sets.len(), 1);
        assert_eq!(loaded.sets[0].kind(), PatternKind::Sha1);
        assert_eq!(loaded.sets[0].accepted_len(), 0);
    }

    #[test]
    fn test_from_dir_loads_only_present_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("name.txt"), "a.txt\n").unwrap();
        fs::write(dir.path().join("gcid.txt"), "ABC\n").unwrap();

        let loaded = PatternSources::default()
            .from_dir(Some(dir.path().to_path_buf()))
            .load()
            .unwrap();

        let kinds: Vec<_> = loaded.sets.iter().map(PatternSet::kind).collect();
        assert_eq!(kinds, vec![PatternKind::Name, PatternKind::Gcid]);
        assert_eq!(
            loaded.inspector().buffer_size(),
            rmfile_core::inspect::DEFAULT_BUFFER_SIZE
        );
    }

    #[test]
    fn test_from_dir_config_renames_files() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("rmfile.toml"),
            "buffer_size = 4096\n[files]\nsha1 = \"known.sha1\"\n",
        )
        .unwrap();
        fs::write(dir.path().join("known.sha1"), "abc\n").unwrap();
        fs::write(dir.path().join("sha1.txt"), "ignored\n").unwrap();

        let loaded = PatternSources::default()
            .from_dir(Some(dir.path().to_path_buf()))
            .load()
            .unwrap();

        assert_eq!(loaded.sets.len(), 1);
        assert_eq!(loaded.sets[0].all_values(), vec!["abc"]);
        assert_eq!(loaded.inspector().buffer_size(), 4096);
    }

    #[test]
    fn test_explicit_file_not_loaded_twice() {
        let dir = TempDir::new().unwrap();
        let sha1 = dir.path().join("sha1.txt");
        fs::write(&sha1, "abc\n").unwrap();

        let loaded = PatternSources::default()
            .file(PatternKind::Sha1, Some(sha1))
            .from_dir(Some(dir.path().to_path_buf()))
            .load()
            .unwrap();

        assert_eq!(loaded.sets.len(), 1);
    }

    #[test]
    fn test_explicit_file_spelled_differently_not_loaded_twice() {
        let dir = TempDir::new().unwrap();
        let patterns = dir.path().join("pat");
        fs::create_dir(&patterns).unwrap();
        fs::write(patterns.join("sha1.txt"), "abc\n").unwrap();

        let loaded = PatternSources::default()
            .file(PatternKind::Sha1, Some(patterns.join(".").join("sha1.txt")))
            .from_dir(Some(dir.path().join("pat").join("..").join("pat")))
            .load()
            .unwrap();

        assert_eq!(loaded.sets.len(), 1);
        assert_eq!(loaded.sets[0].all_values(), vec!["abc"]);
    }
}
