//! Chunked two-level content digest ("gcid")
//!
//! The file is split into fixed-size pieces (see [`crate::piece`]), each piece
//! is hashed with SHA-1, and the final digest is SHA-1 over the concatenated
//! piece digests in file order.

use sha1::{Digest as _, Sha1};

use crate::piece::gcid_piece_size;

/// Incremental gcid accumulator.
///
/// Piece boundaries are tracked internally, so bytes may be fed in slices of
/// any size. Memory use is two SHA-1 states regardless of file length.
#[derive(Clone)]
pub struct GcidHasher {
    piece_size: usize,
    /// Bytes already fed into `piece`
    piece_filled: usize,
    /// Inner hash of the piece being read
    piece: Sha1,
    /// Outer hash over finished piece digests
    outer: Sha1,
}

impl GcidHasher {
    /// Create a hasher splitting input into pieces of `piece_size` bytes
    ///
    /// # Panics
    /// Panics if `piece_size` is zero.
    #[must_use]
    pub fn new(piece_size: usize) -> Self {
        assert!(piece_size > 0, "gcid piece size must be positive");
        Self {
            piece_size,
            piece_filled: 0,
            piece: Sha1::new(),
            outer: Sha1::new(),
        }
    }

    /// Create a hasher for a file of `total_bytes`, using the gcid piece policy
    #[must_use]
    pub fn for_length(total_bytes: u64) -> Self {
        Self::new(gcid_piece_size(total_bytes))
    }

    /// Feed the next bytes of the file
    pub fn update(&mut self, mut data: &[u8]) {
        while !data.is_empty() {
            let room = self.piece_size - self.piece_filled;
            let (head, rest) = data.split_at(room.min(data.len()));
            self.piece.update(head);
            self.piece_filled += head.len();
            if self.piece_filled == self.piece_size {
                self.finish_piece();
            }
            data = rest;
        }
    }

    fn finish_piece(&mut self) {
        let piece_digest = self.piece.finalize_reset();
        self.outer.update(piece_digest);
        self.piece_filled = 0;
    }

    /// Flush the trailing partial piece (if any) and return the digest.
    ///
    /// A length that is an exact multiple of the piece size ends on a full
    /// piece; an empty trailing piece is never hashed. Empty input yields
    /// SHA-1 of the empty string.
    #[must_use]
    pub fn finalize(mut self) -> [u8; 20] {
        if self.piece_filled > 0 {
            self.finish_piece();
        }
        self.outer.finalize().into()
    }
}

/// Compute the gcid of an in-memory buffer
#[must_use]
pub fn gcid_of(data: &[u8]) -> [u8; 20] {
    let mut hasher = GcidHasher::for_length(data.len() as u64);
    hasher.update(data);
    hasher.finalize()
}
