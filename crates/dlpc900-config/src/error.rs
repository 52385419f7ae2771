//! Errors raised while validating a channel map or resolving a sequence.

/// Failures from channel-map validation, persistence, or sequence
/// resolution.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A channel has no `default` mode.
    #[error("channel {channel:?} has no \"default\" mode")]
    MissingDefaultMode {
        /// The offending channel's name.
        channel: String,
    },

    /// A broadcastable argument's length didn't match `channels` and wasn't
    /// a single element.
    #[error("{field} has length {got}, expected 1 or {expected}")]
    LengthMismatch {
        /// Name of the offending field, for diagnostics.
        field: &'static str,
        /// Length actually supplied.
        got: usize,
        /// Length required (the channel count).
        expected: usize,
    },

    /// A requested channel has no entry in the channel map.
    #[error("unknown channel {channel:?}")]
    UnknownChannel {
        /// The offending channel's name.
        channel: String,
    },

    /// A requested mode has no entry under its channel.
    #[error("channel {channel:?} has no mode {mode:?}")]
    UnknownMode {
        /// The channel that was looked up.
        channel: String,
        /// The mode that was missing.
        mode: String,
    },

    /// `noff_before`/`noff_after`/`blank` need an `off` mode that the
    /// channel doesn't define.
    #[error("channel {channel:?} has no \"off\" mode, needed for noff_before/noff_after/blank")]
    MissingOffMode {
        /// The channel missing an `off` mode.
        channel: String,
    },

    /// An index into a mode's firmware-index list was out of bounds.
    #[error("pattern index {index} out of bounds for channel {channel:?} mode {mode:?} (len {len})")]
    IndexOutOfBounds {
        /// The channel being indexed.
        channel: String,
        /// The mode being indexed.
        mode: String,
        /// The out-of-bounds index requested.
        index: usize,
        /// The mode's actual firmware-index count.
        len: usize,
    },

    /// Reading or writing the persisted JSON document failed.
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The persisted JSON document didn't parse.
    #[error("config JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
