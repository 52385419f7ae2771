//! Fuzz target for `dlpc900_codec::erle::decode`.
//!
//! Feeds arbitrary byte sequences against arbitrary (but bounded)
//! width/height pairs to find:
//! - Panics or index-out-of-bounds reads in the hand-rolled run-length
//!   decoder
//! - Integer overflows when accumulating run lengths against the pixel
//!   buffer
//! - Malformed streams (missing terminator, orphan copy-from-previous-line)
//!   that should return `Err`, never panic
//!
//! The fuzzer should NEVER panic. All invalid input should return an error.

#![no_main]

use dlpc900_codec::erle;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let width = usize::from(data[0]) % 64 + 1;
    let height = usize::from(data[1]) % 64 + 1;
    let _ = erle::decode(width, height, &data[2..]);
});
