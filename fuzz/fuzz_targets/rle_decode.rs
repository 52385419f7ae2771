//! Fuzz target for `dlpc900_codec::rle::decode`.
//!
//! Same shape as `erle_decode`, against the plain-RLE decoder, which
//! lacks the copy-from-previous-line token but shares the same run-length
//! accumulation logic.
//!
//! The fuzzer should NEVER panic. All invalid input should return an error.

#![no_main]

use dlpc900_codec::rle;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let width = usize::from(data[0]) % 64 + 1;
    let height = usize::from(data[1]) % 64 + 1;
    let _ = rle::decode(width, height, &data[2..]);
});
