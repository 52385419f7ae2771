//! The transport seam: a narrow, synchronous trait for moving raw HID
//! reports in and out.
//!
//! Everything above this trait (packet assembly, response reassembly) is
//! generic over it, so production code uses [`crate::hidapi_transport::HidApiTransport`]
//! and tests use [`crate::fake::FakeHid`] without either side knowing about
//! the other.

use std::time::Duration;

use crate::error::TransportError;

/// A single 64-byte (or, with a report-id prefix, 65-byte) USB HID
/// read/write primitive.
pub trait HidTransport {
    /// Write one HID report. `report` already includes any report-id
    /// prefix the platform requires.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Io`] if the underlying write fails.
    fn write_report(&mut self, report: &[u8]) -> Result<(), TransportError>;

    /// Read one HID report, blocking up to `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Timeout`] if no report arrives in time, or
    /// [`TransportError::Io`] if the underlying read fails.
    fn read_report(&mut self, timeout: Duration) -> Result<Vec<u8>, TransportError>;

    /// Whether this transport needs a leading zero report-id byte
    /// prepended to every write, and stripped from every read. Most
    /// platforms' HID stacks require this even though the device itself
    /// does not use report IDs.
    fn needs_report_id_prefix(&self) -> bool {
        true
    }
}
