//! Blocking USB HID transport for the DLPC900 command protocol.
//!
//! [`transport::HidTransport`] is the narrow seam between this crate's
//! packet framer and the host's HID stack. [`hidapi_transport::HidApiTransport`]
//! implements it against real hardware; [`fake::FakeHid`] implements it
//! in-memory for tests.

pub mod error;
pub mod fake;
pub mod framer;
pub mod hidapi_transport;
pub mod transport;

pub use error::TransportError;
pub use fake::FakeHid;
pub use framer::{read_response, write_command};
pub use hidapi_transport::HidApiTransport;
pub use transport::HidTransport;
