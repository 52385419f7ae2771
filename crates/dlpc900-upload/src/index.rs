//! Maps a pattern's position in the overall sequence to the combined-image
//! index and bit-plane it lands in after [`dlpc900_codec::combine`] packs
//! patterns 24-to-an-image.
//!
//! Matches `_index_2pic_bit`/`_pic_bit2index` in the reference driver:
//! `pic_index = idx / 24`, `bit_index = idx % 24`.

use dlpc900_codec::MAX_PATTERNS_PER_IMAGE;

/// Split a global pattern index into `(combined image index, bit-plane
/// index within that image)`.
#[must_use]
pub fn index_to_pic_bit(idx: usize) -> (u8, u8) {
    let pic = idx / MAX_PATTERNS_PER_IMAGE;
    let bit = idx % MAX_PATTERNS_PER_IMAGE;
    (pic as u8, bit as u8)
}

/// Inverse of [`index_to_pic_bit`]: recover a pattern's global index from
/// its combined image and bit-plane.
#[must_use]
pub const fn pic_bit_to_index(pic: u8, bit: u8) -> usize {
    pic as usize * MAX_PATTERNS_PER_IMAGE + bit as usize
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn wraps_every_twenty_four_patterns() {
        assert_eq!(index_to_pic_bit(0), (0, 0));
        assert_eq!(index_to_pic_bit(23), (0, 23));
        assert_eq!(index_to_pic_bit(24), (1, 0));
        assert_eq!(index_to_pic_bit(49), (2, 1));
    }

    #[test]
    fn round_trips_with_pic_bit_to_index() {
        for idx in [0usize, 1, 23, 24, 100] {
            let (pic, bit) = index_to_pic_bit(idx);
            assert_eq!(pic_bit_to_index(pic, bit), idx);
        }
    }
}
