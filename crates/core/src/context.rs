//! Per-file state for a single match or learn operation

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::hash::DigestAlgorithm;

/// Lowercase hex digests keyed by algorithm
pub type Digests = BTreeMap<DigestAlgorithm, String>;

/// Everything known about one candidate file during one operation.
///
/// Digests are filled lazily and each algorithm is recorded at most once.
#[derive(Debug, Clone)]
pub struct MatchContext {
    path: PathBuf,
    digests: Digests,
}

impl MatchContext {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            digests: Digests::new(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Base name of the file.
    ///
    /// `None` if the path has no base name (e.g. `/` or `..`) or the name is
    /// not valid UTF-8. Lossy conversion would let distinct names compare
    /// equal.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|name| name.to_str())
    }

    /// Digest recorded for `algorithm`, if inspection produced one
    #[must_use]
    pub fn digest(&self, algorithm: DigestAlgorithm) -> Option<&str> {
        self.digests.get(&algorithm).map(String::as_str)
    }

    /// Merge inspection results; an algorithm already present keeps its value
    pub fn record_digests(&mut self, digests: Digests) {
        for (algorithm, hex) in digests {
            self.digests.entry(algorithm).or_insert(hex);
        }
    }
}
