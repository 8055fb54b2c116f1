//! Piece size policy for the gcid digest

/// Smallest piece size (256 KiB)
pub const MIN_PIECE_SIZE: usize = 0x40000;

/// Largest piece size (2 MiB)
pub const MAX_PIECE_SIZE: usize = 0x200000;

/// Target upper bound on the number of pieces before the piece size grows
const MAX_PIECES: u64 = 0x200;

/// Piece size used to split a file of `total_bytes` for the gcid digest.
///
/// Starts at 256 KiB and doubles while the file would span more than 512
/// pieces, capped at 2 MiB. Same length always yields the same size.
#[must_use]
pub fn gcid_piece_size(total_bytes: u64) -> usize {
    let mut piece_size = MIN_PIECE_SIZE;
    while total_bytes > piece_size as u64 * MAX_PIECES && piece_size < MAX_PIECE_SIZE {
        piece_size <<= 1;
    }
    piece_size
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_files_use_min_piece() {
        assert_eq!(gcid_piece_size(0), MIN_PIECE_SIZE);
        assert_eq!(gcid_piece_size(1), MIN_PIECE_SIZE);
        assert_eq!(gcid_piece_size(128 * 1024 * 1024), MIN_PIECE_SIZE);
    }

    #[test]
    fn test_piece_doubles_past_threshold() {
        // 128 MiB is exactly 512 pieces of 256 KiB, one more byte tips it over
        assert_eq!(gcid_piece_size(128 * 1024 * 1024 + 1), 0x80000);
        assert_eq!(gcid_piece_size(256 * 1024 * 1024 + 1), 0x100000);
        assert_eq!(gcid_piece_size(512 * 1024 * 1024 + 1), MAX_PIECE_SIZE);
    }

    #[test]
    fn test_piece_capped() {
        assert_eq!(gcid_piece_size(u64::from(u32::MAX) * 16), MAX_PIECE_SIZE);
        assert_eq!(gcid_piece_size(u64::MAX), MAX_PIECE_SIZE);
    }
}
