//! Candidate file discovery via the `ignore` crate's walker

use std::path::PathBuf;

use color_eyre::Result;
use color_eyre::eyre::eyre;
use ignore::WalkBuilder;
use tracing::warn;

/// Lists the files under a location.
///
/// Unlike a source-tree walk, nothing is filtered: hidden files and files
/// matched by `.gitignore` are candidates like any other.
pub struct Scanner {
    root: PathBuf,
    follow_links: bool,
}

impl Scanner {
    /// Scanner for a directory, or for a single file
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            follow_links: false,
        }
    }

    /// Descend into symlinked directories
    #[must_use]
    pub fn follow_links(mut self, yes: bool) -> Self {
        self.follow_links = yes;
        self
    }

    fn walk_builder(&self) -> WalkBuilder {
        let mut builder = WalkBuilder::new(&self.root);
        builder
            .standard_filters(false) // No gitignore, hidden or parent-ignore filtering
            .follow_links(self.follow_links);
        builder
    }

    /// Collect every file path under the root, sorted.
    ///
    /// Entries that cannot be read (permissions, races with deletion) are
    /// logged and skipped so one bad directory does not stop the run.
    ///
    /// # Errors
    /// Returns an error if the root itself does not exist.
    pub fn scan(&self) -> Result<Vec<PathBuf>> {
        if !self.root.exists() {
            return Err(eyre!("{} does not exist", self.root.display()));
        }
        if self.root.is_file() {
            return Ok(vec![self.root.clone()]);
        }

        let mut paths = Vec::new();
        for result in self.walk_builder().build() {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry: {e}");
                    continue;
                }
            };

            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            paths.push(path.to_path_buf());
        }

        paths.sort();
        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_scan_simple_directory() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("file1.txt"), "hello").unwrap();
        fs::write(dir.path().join("file2.txt"), "world").unwrap();

        let paths = Scanner::new(dir.path()).scan().unwrap();

        assert_eq!(
            paths,
            vec![dir.path().join("file1.txt"), dir.path().join("file2.txt")]
        );
    }

    #[test]
    fn test_scan_nested_directories() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("sub/dir")).unwrap();
        fs::write(dir.path().join("root.txt"), "root").unwrap();
        fs::write(dir.path().join("sub/nested.txt"), "nested").unwrap();
        fs::write(dir.path().join("sub/dir/deep.txt"), "deep").unwrap();

        let paths = Scanner::new(dir.path()).scan().unwrap();

        assert_eq!(paths.len(), 3);
        assert!(paths.contains(&dir.path().join("sub/dir/deep.txt")));
    }

    #[test]
    fn test_scan_ignores_nothing() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        fs::write(dir.path().join(".gitignore"), "*.log\n").unwrap();
        fs::write(dir.path().join("ignored.log"), "log").unwrap();
        fs::write(dir.path().join(".hidden"), "hidden").unwrap();

        let paths = Scanner::new(dir.path()).scan().unwrap();

        assert!(paths.contains(&dir.path().join("ignored.log")), "paths: {paths:?}");
        assert!(paths.contains(&dir.path().join(".hidden")), "paths: {paths:?}");
        assert!(paths.contains(&dir.path().join(".gitignore")), "paths: {paths:?}");
    }

    #[test]
    fn test_scan_single_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("only.bin");
        fs::write(&file, "x").unwrap();

        assert_eq!(Scanner::new(&file).scan().unwrap(), vec![file]);
    }

    #[test]
    fn test_scan_missing_root() {
        let dir = TempDir::new().unwrap();
        assert!(Scanner::new(dir.path().join("missing")).scan().is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_follow_links() {
        let dir = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        fs::write(outside.path().join("linked.txt"), "linked").unwrap();
        std::os::unix::fs::symlink(outside.path(), dir.path().join("link")).unwrap();

        let plain = Scanner::new(dir.path()).scan().unwrap();
        assert!(plain.is_empty(), "paths: {plain:?}");

        let followed = Scanner::new(dir.path()).follow_links(true).scan().unwrap();
        assert_eq!(followed, vec![dir.path().join("link/linked.txt")]);
    }
}
