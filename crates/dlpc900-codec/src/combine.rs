//! Packs up to 24 binary patterns into a single 24-bit RGB image, one bit
//! per bit-plane, and splits a combined image back apart.

use crate::error::CodecError;

/// A single-bit-depth bitmap: one boolean per pixel, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryPattern {
    /// Width in pixels.
    pub width: usize,
    /// Height in pixels.
    pub height: usize,
    /// One byte per pixel (`0` or `1`), row-major.
    pub pixels: Vec<u8>,
}

impl BinaryPattern {
    /// Build a new all-zero pattern of the given dimensions.
    #[must_use]
    pub fn zeroed(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u8; width * height] }
    }
}

/// A 24-bit RGB bitmap, row-major, one `[R, G, B]` triple per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbImage {
    /// Width in pixels.
    pub width: usize,
    /// Height in pixels.
    pub height: usize,
    /// One `[R, G, B]` triple per pixel, row-major.
    pub pixels: Vec<[u8; 3]>,
}

impl RgbImage {
    fn row(&self, y: usize) -> &[[u8; 3]] {
        &self.pixels[y * self.width..(y + 1) * self.width]
    }
}

/// Number of 1-bit patterns a single combined image can hold.
pub const MAX_PATTERNS_PER_IMAGE: usize = 24;

/// Pack `patterns` into 24-bit RGB images, up to 24 binary patterns per
/// image. Pattern `ii` within a group of 24 lands in bit `ii % 8` of the
/// blue plane for `ii < 8`, the green plane for `8 <= ii < 16`, and the red
/// plane for `16 <= ii < 24`.
///
/// # Errors
///
/// Returns [`CodecError::DimensionMismatch`] if the patterns don't all
/// share the first pattern's dimensions, or [`CodecError::NotBinary`] if
/// any pixel is not `0` or `1`.
pub fn combine(patterns: &[BinaryPattern]) -> Result<Vec<RgbImage>, CodecError> {
    if patterns.is_empty() {
        return Ok(Vec::new());
    }

    let width = patterns[0].width;
    let height = patterns[0].height;

    for pattern in patterns {
        if pattern.width != width || pattern.height != height {
            return Err(CodecError::DimensionMismatch {
                expected_width: width,
                expected_height: height,
                width: pattern.width,
                height: pattern.height,
            });
        }
        if let Some(&value) = pattern.pixels.iter().find(|&&v| v > 1) {
            return Err(CodecError::NotBinary { value });
        }
    }

    let mut images = Vec::with_capacity(patterns.len().div_ceil(MAX_PATTERNS_PER_IMAGE));
    for group in patterns.chunks(MAX_PATTERNS_PER_IMAGE) {
        let mut pixels = vec![[0u8; 3]; width * height];
        for (ii, pattern) in group.iter().enumerate() {
            let (channel, shift) = plane_and_shift(ii);
            for (px, &bit) in pixels.iter_mut().zip(&pattern.pixels) {
                px[channel] |= bit << shift;
            }
        }
        images.push(RgbImage { width, height, pixels });
    }
    Ok(images)
}

/// Inverse of [`combine`]: always returns 24 patterns, the trailing ones
/// all-zero if fewer than 24 were originally packed (that information is
/// not recoverable from the image alone).
#[must_use]
pub fn split(image: &RgbImage) -> Vec<BinaryPattern> {
    (0..MAX_PATTERNS_PER_IMAGE)
        .map(|ii| {
            let (channel, shift) = plane_and_shift(ii);
            let pixels = image.pixels.iter().map(|px| (px[channel] >> shift) & 1).collect();
            BinaryPattern { width: image.width, height: image.height, pixels }
        })
        .collect()
}

/// Which RGB channel and bit shift a combined-image bit plane index maps
/// to: blue for 0..8, green for 8..16, red for 16..24.
const fn plane_and_shift(ii: usize) -> (usize, u8) {
    match ii {
        0..=7 => (2, ii as u8),
        8..=15 => (1, (ii - 8) as u8),
        _ => (0, (ii - 16) as u8),
    }
}

/// Split an image's rows into the two halves sent to the primary and
/// secondary controller on dual-controller panels.
#[must_use]
pub fn split_columns(image: &RgbImage) -> (RgbImage, RgbImage) {
    let half_width = image.width / 2;
    let mut primary = Vec::with_capacity(half_width * image.height);
    let mut secondary = Vec::with_capacity(half_width * image.height);
    for y in 0..image.height {
        let row = image.row(y);
        primary.extend_from_slice(&row[..half_width]);
        secondary.extend_from_slice(&row[half_width..]);
    }
    (
        RgbImage { width: half_width, height: image.height, pixels: primary },
        RgbImage { width: half_width, height: image.height, pixels: secondary },
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn solid(width: usize, height: usize, value: u8) -> BinaryPattern {
        BinaryPattern { width, height, pixels: vec![value; width * height] }
    }

    #[test]
    fn combine_rejects_dimension_mismatch() {
        let patterns = vec![solid(4, 4, 1), solid(2, 2, 1)];
        assert!(combine(&patterns).is_err());
    }

    #[test]
    fn combine_rejects_non_binary_pixels() {
        let mut p = solid(2, 2, 0);
        p.pixels[0] = 5;
        assert!(combine(&[p]).is_err());
    }

    #[test]
    fn single_pattern_lands_in_blue_bit_zero() {
        let images = combine(&[solid(2, 2, 1)]).unwrap();
        assert_eq!(images.len(), 1);
        assert!(images[0].pixels.iter().all(|px| *px == [0, 0, 1]));
    }

    #[test]
    fn twenty_fifth_pattern_starts_a_new_image() {
        let patterns: Vec<_> = (0..25).map(|_| solid(1, 1, 1)).collect();
        let images = combine(&patterns).unwrap();
        assert_eq!(images.len(), 2);
        assert_eq!(images[1].pixels[0], [0, 0, 1]);
    }

    #[test]
    fn split_recovers_each_bit_plane() {
        let mut patterns: Vec<_> = (0..24).map(|_| solid(2, 2, 0)).collect();
        patterns[0].pixels[0] = 1; // blue bit 0
        patterns[8].pixels[0] = 1; // green bit 0
        patterns[16].pixels[0] = 1; // red bit 0

        let images = combine(&patterns).unwrap();
        let recovered = split(&images[0]);

        assert_eq!(recovered[0].pixels[0], 1);
        assert_eq!(recovered[8].pixels[0], 1);
        assert_eq!(recovered[16].pixels[0], 1);
        assert_eq!(recovered[1].pixels[0], 0);
    }

    #[test]
    fn split_columns_splits_evenly() {
        let image = RgbImage { width: 4, height: 1, pixels: vec![[1, 0, 0], [2, 0, 0], [3, 0, 0], [4, 0, 0]] };
        let (primary, secondary) = split_columns(&image);
        assert_eq!(primary.pixels, vec![[1, 0, 0], [2, 0, 0]]);
        assert_eq!(secondary.pixels, vec![[3, 0, 0], [4, 0, 0]]);
    }
}
