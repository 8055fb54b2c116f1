//! Single-pass content inspection
//!
//! Reads a file once and feeds every required digest algorithm from the same
//! buffer, so adding a second content criterion never costs a second read.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use tracing::trace;

use crate::context::Digests;
use crate::error::{MatchError, Result};
use crate::hash::{DigestAlgorithm, Digester};
use crate::pattern::PatternSet;

/// Read buffer size when no criterion needs a specific one (64 KiB)
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Computes the content digests a group of pattern sets needs for a file
pub trait Inspect {
    /// Digest `path` once for every algorithm required by `sets`
    ///
    /// # Errors
    /// Returns an error if the sets disagree on the read buffer size or the
    /// file cannot be read.
    fn digests_for(&self, path: &Path, sets: &[PatternSet]) -> Result<Digests>;
}

/// File-backed inspector
#[derive(Debug, Clone)]
pub struct ContentInspector {
    buffer_size: usize,
}

impl Default for ContentInspector {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentInspector {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    /// Use `buffer_size` for reads when no set requests a size of its own
    #[must_use]
    pub fn with_buffer_size(buffer_size: usize) -> Self {
        Self {
            buffer_size: buffer_size.max(1),
        }
    }

    #[must_use]
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Pick the read size for a file of `total_bytes`
    fn read_size(&self, path: &Path, sets: &[PatternSet], total_bytes: u64) -> Result<usize> {
        choose_read_size(
            path,
            sets.iter().filter_map(|set| set.buffer_hint(total_bytes)),
            self.buffer_size,
        )
    }
}

/// Reconcile buffer hints into one read size.
///
/// Every hint must agree; there is no way to serve two piece sizes from one
/// sequence of reads.
fn choose_read_size(
    path: &Path,
    hints: impl IntoIterator<Item = usize>,
    default: usize,
) -> Result<usize> {
    let hints: BTreeSet<usize> = hints.into_iter().collect();
    let mut distinct = hints.iter().copied();
    match (distinct.next(), distinct.next()) {
        (None, _) => Ok(default),
        (Some(hint), None) => Ok(hint),
        (Some(_), Some(_)) => Err(MatchError::ConfigurationConflict {
            path: path.to_path_buf(),
            hints: hints.into_iter().collect(),
        }),
    }
}

impl Inspect for ContentInspector {
    fn digests_for(&self, path: &Path, sets: &[PatternSet]) -> Result<Digests> {
        let algorithms: BTreeSet<DigestAlgorithm> =
            sets.iter().filter_map(PatternSet::digest_algorithm).collect();
        if algorithms.is_empty() {
            return Ok(Digests::new());
        }

        let file = File::open(path).map_err(|e| MatchError::io(path, e))?;
        let total_bytes = file.metadata().map_err(|e| MatchError::io(path, e))?.len();
        let read_size = self.read_size(path, sets, total_bytes)?;

        trace!(
            "Inspecting {} ({total_bytes} bytes, {read_size} byte reads, {} algorithms)",
            path.display(),
            algorithms.len()
        );

        digest_reader(file, total_bytes, read_size, algorithms).map_err(|e| MatchError::io(path, e))
    }
}

/// Run every algorithm over `reader` in one pass of `read_size` byte reads.
///
/// `total_bytes` is the expected stream length; gcid derives its piece size
/// from it.
///
/// # Errors
/// Returns the first read error; no digests are produced in that case.
pub fn digest_reader<R: Read>(
    mut reader: R,
    total_bytes: u64,
    read_size: usize,
    algorithms: impl IntoIterator<Item = DigestAlgorithm>,
) -> io::Result<Digests> {
    let mut digesters: Vec<Digester> = algorithms
        .into_iter()
        .map(|algorithm| Digester::new(algorithm, total_bytes))
        .collect();

    // Reused for every read
    let mut buffer = vec![0u8; read_size.max(1)];

    loop {
        let filled = read_full(&mut reader, &mut buffer)?;
        if filled == 0 {
            break;
        }
        for digester in &mut digesters {
            digester.update(&buffer[..filled]);
        }
        if filled < buffer.len() {
            break;
        }
    }

    Ok(digesters
        .into_iter()
        .map(|digester| (digester.algorithm(), digester.finalize_hex()))
        .collect())
}

/// Fill `buf` as far as the reader allows; a short count means end of stream
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
