//! Status, firmware, trigger, and display-mode commands for the DLPC900
//! pattern projector, plus the [`Driver`] aggregate that everything else in
//! this workspace builds on.

pub mod clock;
pub mod driver;
pub mod error;
pub mod status;

pub use clock::{Clock, NullClock, SystemClock};
pub use driver::{DEFAULT_TIMEOUT, Driver, MODE_CHANGE_SETTLE, RETRY_DELAY, WRITE_SETTLE};
pub use error::DriverError;
pub use status::{DisplayMode, FirmwareVersion, StatusFlags, TriggerConfig};
