//! Inputs to the upload orchestrator.

use dlpc900_codec::BinaryPattern;
use dlpc900_proto::{CompressionMode, PanelProfile};

use crate::error::UploadError;

/// Minimum exposure time the controller accepts for a pattern, in
/// microseconds, matching the reference driver's default and the
/// programmer's guide's documented floor.
pub const MIN_EXPOSURE_US: u32 = 105;

/// Bit depth this driver's combiner path supports. The reference driver
/// raises `NotImplementedError` for anything else.
pub const SUPPORTED_BIT_DEPTH: u8 = 1;

/// Either one value broadcast to every pattern, or one value per pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PerPattern<T> {
    /// Apply the same value to every pattern.
    Broadcast(T),
    /// One value per pattern, in display order.
    Each(Vec<T>),
}

impl<T: Copy> PerPattern<T> {
    /// Resolve against `pattern_count`, broadcasting a single value or
    /// validating a per-pattern sequence's length.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::LengthMismatch`] if [`PerPattern::Each`] does
    /// not contain exactly `pattern_count` entries.
    pub fn resolve(&self, field: &'static str, pattern_count: usize) -> Result<Vec<T>, UploadError> {
        match self {
            Self::Broadcast(value) => Ok(vec![*value; pattern_count]),
            Self::Each(values) => {
                if values.len() != pattern_count {
                    return Err(UploadError::LengthMismatch {
                        field,
                        got: values.len(),
                        expected: pattern_count,
                    });
                }
                Ok(values.clone())
            },
        }
    }
}

/// A request to upload and run a pattern sequence over USB ("on the fly"),
/// as opposed to one already stored in the controller's flash.
#[derive(Debug, Clone)]
pub struct PatternUploadRequest {
    /// The binary patterns to display, in display order.
    pub patterns: Vec<BinaryPattern>,
    /// Which DMD panel is attached (determines whether bitmaps are split
    /// across two controllers).
    pub panel: PanelProfile,
    /// Bitmap compression to use when streaming pattern images.
    pub compression: CompressionMode,
    /// Exposure time(s) for each pattern, in microseconds. Every resolved
    /// value must be at least [`MIN_EXPOSURE_US`].
    pub exposures_us: PerPattern<u32>,
    /// Dark time(s) applied after each pattern, in microseconds.
    pub dark_us: PerPattern<u16>,
    /// Bit depth to combine patterns at. Only [`SUPPORTED_BIT_DEPTH`] is
    /// currently implemented.
    pub bit_depth: u8,
    /// Number of times to repeat the sequence once it reaches the end, or
    /// `0` to repeat indefinitely.
    pub num_repeats: u32,
    /// Wait for an external trigger before displaying each pattern. When
    /// set, the sequence is armed and then immediately stopped rather than
    /// left free-running, since the controller will advance it itself on
    /// each trigger pulse.
    pub triggered: bool,
}

impl PatternUploadRequest {
    /// Validate this request against the controller's documented limits,
    /// resolving the per-pattern exposure/dark-time fields.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::EmptyRequest`] if no patterns were supplied,
    /// [`UploadError::LengthMismatch`] if a per-pattern field's length
    /// doesn't match the pattern count, [`UploadError::ExposureTooShort`]
    /// if any resolved exposure is below [`MIN_EXPOSURE_US`], or
    /// [`UploadError::UnsupportedBitDepth`] if `bit_depth` isn't
    /// [`SUPPORTED_BIT_DEPTH`].
    pub fn validate(&self) -> Result<(Vec<u32>, Vec<u16>), UploadError> {
        if self.patterns.is_empty() {
            return Err(UploadError::EmptyRequest);
        }
        if self.bit_depth != SUPPORTED_BIT_DEPTH {
            return Err(UploadError::UnsupportedBitDepth(self.bit_depth));
        }

        let exposures = self.exposures_us.resolve("exposures_us", self.patterns.len())?;
        let dark = self.dark_us.resolve("dark_us", self.patterns.len())?;

        for (index, &value) in exposures.iter().enumerate() {
            if value < MIN_EXPOSURE_US {
                return Err(UploadError::ExposureTooShort { index, value, min: MIN_EXPOSURE_US });
            }
        }

        Ok((exposures, dark))
    }
}

/// A request to run a pattern sequence already stored in the controller's
/// flash, referencing patterns by their stored image/bit-plane indices
/// instead of uploading new bitmaps.
#[derive(Debug, Clone)]
pub struct PreStoredSequenceRequest {
    /// `(stored_image_index, stored_image_bit_index)` for each pattern, in
    /// display order.
    pub stored_indices: Vec<(u8, u8)>,
    /// Exposure time(s) for each pattern, in microseconds.
    pub exposures_us: PerPattern<u32>,
    /// Dark time(s) applied after each pattern, in microseconds.
    pub dark_us: PerPattern<u16>,
    /// Number of times to repeat the sequence once it reaches the end, or
    /// `0` to repeat indefinitely.
    pub num_repeats: u32,
    /// Wait for an external trigger before displaying each pattern.
    pub triggered: bool,
}

impl PreStoredSequenceRequest {
    /// Validate this request, resolving the per-pattern exposure/dark-time
    /// fields.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::EmptyRequest`] if no indices were supplied,
    /// [`UploadError::LengthMismatch`] if a per-pattern field's length
    /// doesn't match the index count, or [`UploadError::ExposureTooShort`]
    /// if any resolved exposure is below [`MIN_EXPOSURE_US`].
    pub fn validate(&self) -> Result<(Vec<u32>, Vec<u16>), UploadError> {
        if self.stored_indices.is_empty() {
            return Err(UploadError::EmptyRequest);
        }

        let exposures = self.exposures_us.resolve("exposures_us", self.stored_indices.len())?;
        let dark = self.dark_us.resolve("dark_us", self.stored_indices.len())?;

        for (index, &value) in exposures.iter().enumerate() {
            if value < MIN_EXPOSURE_US {
                return Err(UploadError::ExposureTooShort { index, value, min: MIN_EXPOSURE_US });
            }
        }

        Ok((exposures, dark))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn broadcast_resolves_to_repeated_value() {
        let spec = PerPattern::Broadcast(42u32);
        assert_eq!(spec.resolve("exposures_us", 3).unwrap(), vec![42, 42, 42]);
    }

    #[test]
    fn each_rejects_wrong_length() {
        let spec = PerPattern::Each(vec![1u32, 2]);
        let err = spec.resolve("exposures_us", 3).unwrap_err();
        assert_eq!(err, UploadError::LengthMismatch { field: "exposures_us", got: 2, expected: 3 });
    }
}
