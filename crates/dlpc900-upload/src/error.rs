//! Errors raised while orchestrating a pattern upload.

/// Everything that can go wrong while uploading a pattern sequence.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UploadError {
    /// The LUT controller rejected an operation or a command failed.
    #[error(transparent)]
    Lut(#[from] dlpc900_lut::LutError),

    /// A pattern bitmap could not be combined or compressed.
    #[error(transparent)]
    Codec(#[from] dlpc900_codec::CodecError),

    /// No patterns were supplied.
    #[error("at least one pattern is required")]
    EmptyRequest,

    /// A per-pattern `exposures_us`/`dark_us` sequence did not have one
    /// entry per pattern (and wasn't a single broadcast value either).
    #[error("{field} has {got} entries, expected 1 (broadcast) or {expected}")]
    LengthMismatch {
        /// Which field was malformed.
        field: &'static str,
        /// Entries actually supplied.
        got: usize,
        /// Number of patterns the request carries.
        expected: usize,
    },

    /// An exposure time fell below the controller's documented minimum.
    #[error("exposure_us[{index}] = {value} is below the minimum of {min}us")]
    ExposureTooShort {
        /// Index of the offending pattern.
        index: usize,
        /// The exposure time that was rejected, in microseconds.
        value: u32,
        /// Minimum exposure time the controller accepts, in microseconds.
        min: u32,
    },

    /// A bit depth other than 1 was requested; only binary patterns are
    /// supported by the combiner path.
    #[error("bit depth {0} is not supported (only 1-bit patterns can be combined)")]
    UnsupportedBitDepth(u8),
}
