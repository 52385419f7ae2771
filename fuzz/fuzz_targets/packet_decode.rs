//! Fuzz target for `dlpc900_proto::ResponsePacket::decode`.
//!
//! Exercises the 4-byte header parser the transport's framer hands
//! reassembled HID-report bytes to. Looks for:
//! - Panics or out-of-bounds slicing on truncated/declared-length-mismatch
//!   buffers
//! - Integer overflow reading the little-endian length field
//!
//! The fuzzer should NEVER panic. All invalid input should return an error.

#![no_main]

use dlpc900_proto::ResponsePacket;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = ResponsePacket::decode(data);
});
