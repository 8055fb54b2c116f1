use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by matching and learning operations
#[derive(Debug, Error)]
pub enum MatchError {
    /// Two content criteria asked for different read buffer sizes in one pass
    #[error("conflicting buffer sizes {hints:?} required to inspect {}", .path.display())]
    ConfigurationConflict { path: PathBuf, hints: Vec<usize> },

    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no pattern sets given")]
    NoPatterns,
}

impl MatchError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = MatchError> = std::result::Result<T, E>;
