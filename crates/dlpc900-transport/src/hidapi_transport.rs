//! The real HID adapter, backed by the `hidapi` crate.

use std::time::Duration;

use hidapi::{HidApi, HidDevice};
use tracing::{debug, info};

use crate::{error::TransportError, transport::HidTransport};

/// USB vendor id Texas Instruments DLPC900 controllers enumerate under.
pub const VENDOR_ID: u16 = 0x0451;
/// USB product id the DLPC900 controller family enumerates under.
pub const PRODUCT_ID: u16 = 0xC900;

/// A DLPC900 controller reached through the host's native HID stack.
pub struct HidApiTransport {
    device: HidDevice,
}

impl HidApiTransport {
    /// Open the first DLPC900 controller found by vendor/product id.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::DeviceNotFound`] if no such device is
    /// present, or [`TransportError::Io`] if the HID subsystem itself
    /// fails to initialize.
    pub fn open_first() -> Result<Self, TransportError> {
        Self::open(VENDOR_ID, PRODUCT_ID)
    }

    /// Open the first device matching `vendor_id`/`product_id`.
    ///
    /// # Errors
    ///
    /// See [`HidApiTransport::open_first`].
    pub fn open(vendor_id: u16, product_id: u16) -> Result<Self, TransportError> {
        let api = HidApi::new().map_err(|e| TransportError::Io(e.to_string()))?;
        let device = api.open(vendor_id, product_id).map_err(|_| TransportError::DeviceNotFound {
            vendor_id,
            product_id,
        })?;
        info!(vendor_id, product_id, "opened DLPC900 HID device");
        Ok(Self { device })
    }

    /// Open a device by its platform-specific HID path (as returned by
    /// enumeration), bypassing vendor/product matching.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Io`] if the path cannot be opened.
    pub fn open_path(path: &str) -> Result<Self, TransportError> {
        let api = HidApi::new().map_err(|e| TransportError::Io(e.to_string()))?;
        let c_path = std::ffi::CString::new(path).map_err(|e| TransportError::Io(e.to_string()))?;
        let device = api.open_path(&c_path).map_err(|e| TransportError::Io(e.to_string()))?;
        info!(path, "opened DLPC900 HID device by path");
        Ok(Self { device })
    }

    /// Enumerate HID device paths matching the DLPC900 vendor/product id,
    /// for callers building their own device picker.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Io`] if the HID subsystem fails to
    /// initialize.
    pub fn enumerate_paths() -> Result<Vec<String>, TransportError> {
        let api = HidApi::new().map_err(|e| TransportError::Io(e.to_string()))?;
        Ok(api
            .device_list()
            .filter(|info| info.vendor_id() == VENDOR_ID && info.product_id() == PRODUCT_ID)
            .filter_map(|info| info.path().to_str().ok().map(str::to_owned))
            .collect())
    }
}

impl HidTransport for HidApiTransport {
    fn write_report(&mut self, report: &[u8]) -> Result<(), TransportError> {
        debug!(bytes = report.len(), "writing HID report");
        self.device.write(report).map_err(|e| TransportError::Io(e.to_string()))?;
        Ok(())
    }

    fn read_report(&mut self, timeout: Duration) -> Result<Vec<u8>, TransportError> {
        let mut buf = vec![0u8; dlpc900_proto::HID_REPORT_LEN + 1];
        let timeout_ms = i32::try_from(timeout.as_millis()).unwrap_or(i32::MAX);
        let n = self
            .device
            .read_timeout(&mut buf, timeout_ms)
            .map_err(|e| TransportError::Io(e.to_string()))?;
        if n == 0 {
            return Err(TransportError::Timeout(timeout));
        }
        buf.truncate(n);
        Ok(buf)
    }
}
