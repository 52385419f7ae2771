//! Wire format for the DLPC900 USB HID command protocol.
//!
//! This crate is sans-I/O: it only builds and parses byte buffers. Sending
//! those buffers over USB HID, including splitting them across 64-byte
//! reports, is [`dlpc900-transport`](https://docs.rs/dlpc900-transport)'s
//! job.

pub mod bitmap_header;
pub mod error;
pub mod lut_entry;
pub mod opcode;
pub mod packet;
pub mod panel;

pub use bitmap_header::{BitmapHeader, CompressionMode};
pub use bytes::Bytes;
pub use error::ProtoError;
pub use lut_entry::{LED_SELECT_DISABLED, LutEntry};
pub use opcode::{HARDWARE_STATUS_BITS, MAIN_STATUS_BITS, Opcode, error_description};
pub use packet::{CommandPacket, FlagByte, HID_REPORT_LEN, MAX_COMMAND_PAYLOAD, ResponsePacket};
pub use panel::PanelProfile;
