//! Errors surfaced by [`crate::driver::Driver`].

use dlpc900_proto::ProtoError;
use dlpc900_transport::TransportError;

use crate::status::DisplayMode;

/// Everything that can go wrong while talking to a DLPC900 controller
/// through a [`crate::driver::Driver`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DriverError {
    /// The HID transport failed to move bytes.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A packet could not be encoded or decoded.
    #[error(transparent)]
    Proto(#[from] ProtoError),

    /// The controller set the error flag on a response. `description` is
    /// fetched with a follow-up `Read_Error_Description` command.
    #[error("controller reported error {code}: {description}")]
    Controller {
        /// The raw code from `Read_Error_Code`.
        code: u8,
        /// The controller's own description of the error.
        description: String,
    },

    /// A response payload was shorter than the field being parsed needs.
    #[error("expected at least {expected} response bytes, got {got}")]
    UnexpectedPayloadLength {
        /// Minimum payload length the parser needs.
        expected: usize,
        /// Payload length actually received.
        got: usize,
    },

    /// A display-mode write did not take effect after being read back.
    #[error("display mode did not activate: wrote {expected:?}, read back {actual:?}")]
    ModeActivationError {
        /// The mode that was written.
        expected: DisplayMode,
        /// The mode the controller reported afterwards.
        actual: DisplayMode,
    },

    /// A trigger delay fell outside the controller's representable range.
    #[error("trigger delay {value}us exceeds the +/-{max}us range")]
    TriggerDelayOutOfRange {
        /// The value that was rejected.
        value: i32,
        /// The maximum magnitude allowed in either direction.
        max: i32,
    },
}
