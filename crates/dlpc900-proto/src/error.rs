//! Error types for packet and record encoding/decoding.

use thiserror::Error;

/// Errors raised while building or parsing the wire format.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtoError {
    /// A command payload exceeded the controller's maximum payload size.
    #[error("payload too large: {size} bytes (max {max})")]
    PayloadTooLarge {
        /// Size of the payload that was rejected.
        size: usize,
        /// Maximum payload size allowed.
        max: usize,
    },

    /// A response buffer was shorter than the fixed header it must contain.
    #[error("response truncated: got {got} bytes, need at least {need}")]
    Truncated {
        /// Bytes actually available.
        got: usize,
        /// Bytes required to parse the header.
        need: usize,
    },

    /// A response declared a payload length that ran past the buffer.
    #[error("declared payload length {declared} exceeds available {available} bytes")]
    PayloadLengthMismatch {
        /// Length declared in the response header.
        declared: usize,
        /// Bytes actually available after the header.
        available: usize,
    },

    /// An opcode value did not match any known command.
    #[error("unknown opcode {0:#06x}")]
    UnknownOpcode(u16),

    /// A field value was out of the range the wire format can represent.
    #[error("field {field} out of range: {value} (max {max})")]
    FieldOutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// Value that was rejected.
        value: i64,
        /// Maximum value the field can represent on the wire.
        max: i64,
    },
}
