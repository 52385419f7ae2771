//! Plain run-length encoding for 24-bit RGB pattern bitmaps.
//!
//! Unlike [`crate::erle`], RLE never reuses a previous scanline — every row
//! is encoded as its own sequence of run tokens (a length followed by one
//! repeated `[B, G, R]` triple). The stream ends with a single
//! end-of-image token (`0x00` followed by the length-encoding of `0`), so
//! it always ends in `0x00`.

use crate::{
    combine::RgbImage,
    error::CodecError,
    varint::{decode_length, encode_length},
};

/// Encode `image` as a plain RLE byte stream.
///
/// # Errors
///
/// Returns [`CodecError::LengthOutOfRange`] if a run exceeds the 15-bit
/// length the wire format can represent.
pub fn encode(image: &RgbImage) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::new();

    for y in 0..image.height {
        let row = &image.pixels[y * image.width..(y + 1) * image.width];
        encode_row_runs(row, &mut out)?;
    }

    out.push(0x00);
    out.extend(encode_length(0)?);
    Ok(out)
}

fn encode_row_runs(row: &[[u8; 3]], out: &mut Vec<u8>) -> Result<(), CodecError> {
    let mut start = 0;
    while start < row.len() {
        let value = row[start];
        let mut end = start + 1;
        while end < row.len() && row[end] == value {
            end += 1;
        }
        let run_len = end - start;
        out.extend(encode_length(run_len)?);
        out.push(value[2]); // B
        out.push(value[1]); // G
        out.push(value[0]); // R
        start = end;
    }
    Ok(())
}

/// Decode a plain RLE byte stream into an image of the given dimensions.
///
/// # Errors
///
/// Returns [`CodecError::Truncated`] if the stream ends mid-token,
/// [`CodecError::NotTerminated`] if it does not end in a `0x00` byte, or
/// [`CodecError::RowOverflow`] if a run claims more pixels than remain on
/// the row.
pub fn decode(width: usize, height: usize, bytes: &[u8]) -> Result<RgbImage, CodecError> {
    if bytes.last() != Some(&0x00) {
        return Err(CodecError::NotTerminated);
    }

    let mut pixels = vec![[0u8; 3]; width * height];
    let mut pos = 0;

    for y in 0..height {
        let mut x = 0;
        while x < width {
            let control = *bytes.get(pos).ok_or(CodecError::Truncated)?;
            if control == 0x00 {
                // End-of-image token reached before the expected number of
                // rows were filled; leave the remainder zeroed.
                return Ok(RgbImage { width, height, pixels });
            }

            let length = decode_length(bytes, &mut pos)?;
            let b = *bytes.get(pos).ok_or(CodecError::Truncated)?;
            let g = *bytes.get(pos + 1).ok_or(CodecError::Truncated)?;
            let r = *bytes.get(pos + 2).ok_or(CodecError::Truncated)?;
            pos += 3;
            if x + length > width {
                return Err(CodecError::RowOverflow { x, run_len: length, width });
            }
            for i in 0..length {
                pixels[y * width + x + i] = [r, g, b];
            }
            x += length;
        }
    }

    Ok(RgbImage { width, height, pixels })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn checkerboard(width: usize, height: usize) -> RgbImage {
        let pixels = (0..width * height)
            .map(|i| if (i % width + i / width) % 2 == 0 { [1, 0, 0] } else { [0, 0, 1] })
            .collect();
        RgbImage { width, height, pixels }
    }

    #[test]
    fn stream_always_ends_in_zero() {
        let image = checkerboard(6, 2);
        let encoded = encode(&image).unwrap();
        assert_eq!(*encoded.last().unwrap(), 0x00);
    }

    #[test]
    fn checkerboard_round_trips() {
        let image = checkerboard(9, 3);
        let encoded = encode(&image).unwrap();
        let decoded = decode(9, 3, &encoded).unwrap();
        assert_eq!(decoded, image);
    }

    #[test]
    fn decode_rejects_stream_missing_trailing_zero() {
        let err = decode(4, 1, &[4, 1, 2, 3]).unwrap_err();
        assert_eq!(err, CodecError::NotTerminated);
    }

    #[test]
    fn decode_rejects_run_longer_than_row() {
        let err = decode(1, 1, &[5, 0, 0, 0, 0]).unwrap_err();
        assert_eq!(err, CodecError::RowOverflow { x: 0, run_len: 5, width: 1 });
    }
}
