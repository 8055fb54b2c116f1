//! Content digest algorithms and their accumulators

use std::fmt;

use sha1::{Digest as _, Sha1};

use crate::gcid::GcidHasher;

/// Content digest algorithm a pattern set can require
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DigestAlgorithm {
    /// Plain SHA-1 over the whole file
    Sha1,
    /// SHA-1 of concatenated per-piece SHA-1 digests
    Gcid,
}

impl DigestAlgorithm {
    /// Stable lowercase name, used as the digest key
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Sha1 => "sha1",
            Self::Gcid => "gcid",
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Running state of one digest algorithm over a byte stream
#[derive(Clone)]
pub enum Digester {
    Sha1(Sha1),
    Gcid(GcidHasher),
}

impl Digester {
    /// Start a digest for a file of `total_bytes`.
    ///
    /// The length only matters for gcid, where it fixes the piece size.
    #[must_use]
    pub fn new(algorithm: DigestAlgorithm, total_bytes: u64) -> Self {
        match algorithm {
            DigestAlgorithm::Sha1 => Self::Sha1(Sha1::new()),
            DigestAlgorithm::Gcid => Self::Gcid(GcidHasher::for_length(total_bytes)),
        }
    }

    #[must_use]
    pub fn algorithm(&self) -> DigestAlgorithm {
        match self {
            Self::Sha1(_) => DigestAlgorithm::Sha1,
            Self::Gcid(_) => DigestAlgorithm::Gcid,
        }
    }

    /// Feed the next bytes
    pub fn update(&mut self, data: &[u8]) {
        match self {
            Self::Sha1(hasher) => hasher.update(data),
            Self::Gcid(hasher) => hasher.update(data),
        }
    }

    /// Consume the accumulator and return the raw digest
    #[must_use]
    pub fn finalize(self) -> [u8; 20] {
        match self {
            Self::Sha1(hasher) => hasher.finalize().into(),
            Self::Gcid(hasher) => hasher.finalize(),
        }
    }

    /// Consume the accumulator and return the digest as lowercase hex
    #[must_use]
    pub fn finalize_hex(self) -> String {
        hex::encode(self.finalize())
    }
}

impl fmt::Debug for Digester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digester({})", self.algorithm())
    }
}
