//! Codec errors.

use thiserror::Error;

/// Errors raised by the pattern combiner or the ERLE/RLE codec.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Two patterns passed to [`crate::combine::combine`] had different
    /// dimensions.
    #[error("pattern dimensions mismatch: expected {expected_width}x{expected_height}, got {width}x{height}")]
    DimensionMismatch {
        /// Width shared by the other patterns in the call.
        expected_width: usize,
        /// Height shared by the other patterns in the call.
        expected_height: usize,
        /// Width of the offending pattern.
        width: usize,
        /// Height of the offending pattern.
        height: usize,
    },

    /// A pattern pixel was neither 0 nor 1.
    #[error("pattern pixel {value} is not binary (must be 0 or 1)")]
    NotBinary {
        /// The offending pixel value.
        value: u8,
    },

    /// A run length or count exceeded the 15-bit range the wire format can
    /// represent.
    #[error("run length {0} exceeds the maximum representable length")]
    LengthOutOfRange(usize),

    /// The encoded byte stream ended before a token could be fully read.
    #[error("truncated bitmap stream")]
    Truncated,

    /// A cross-line copy token appeared on the image's first line, where
    /// there is no previous line to copy from.
    #[error("copy-from-previous-line token on the first scanline")]
    NoPreviousLine,

    /// The decoded image did not contain exactly the expected number of
    /// scanlines worth of pixels, or the stream was not terminated with a
    /// trailing zero byte.
    #[error("bitmap stream not terminated with 0x00")]
    NotTerminated,

    /// A run, copy, or literal token claimed more pixels than remain on the
    /// current scanline.
    #[error("run of {run_len} pixels at column {x} overflows a {width}-pixel row")]
    RowOverflow {
        /// Column the run started at.
        x: usize,
        /// Number of pixels the token claimed.
        run_len: usize,
        /// Width of the image being decoded.
        width: usize,
    },
}
