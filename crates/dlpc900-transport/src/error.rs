//! Transport-layer errors.

use thiserror::Error;

/// Errors that can occur while talking to a DLPC900 controller over HID.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TransportError {
    /// The underlying HID device returned an I/O error.
    #[error("HID I/O error: {0}")]
    Io(String),

    /// No matching HID device was found during enumeration.
    #[error("no HID device found for vendor {vendor_id:#06x} product {product_id:#06x}")]
    DeviceNotFound {
        /// Vendor id that was searched for.
        vendor_id: u16,
        /// Product id that was searched for.
        product_id: u16,
    },

    /// A read did not complete within the requested timeout.
    #[error("read timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// A command or response buffer was malformed.
    #[error("protocol error: {0}")]
    Protocol(#[from] dlpc900_proto::ProtoError),

    /// A test double had no queued reply to return.
    #[error("no reply queued for this request")]
    NoReplyQueued,
}
