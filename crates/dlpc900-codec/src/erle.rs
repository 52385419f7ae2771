//! Enhanced run-length encoding for 24-bit RGB pattern bitmaps.
//!
//! Each scanline is either a copy of the previous scanline (one token) or a
//! sequence of run-length tokens. A run token whose length-encoding's first
//! byte is `0x00` is reserved: the value that follows tags the token as
//! end-of-line (`0`), copy-from-previous-line (`1`, followed by a count),
//! or a literal run of `n` raw pixels (`n > 1`). Every other token is a
//! normal run: a length followed by one `[B, G, R]` triple repeated that
//! many times. The stream ends with a zero-length copy-from-previous-line
//! token, so it always ends in `0x00`.

use crate::{
    combine::RgbImage,
    error::CodecError,
    varint::{decode_length, encode_length},
};

/// Encode `image` as an ERLE byte stream.
///
/// # Errors
///
/// Returns [`CodecError::LengthOutOfRange`] if a run or the image width
/// exceeds the 15-bit length the wire format can represent.
pub fn encode(image: &RgbImage) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::new();
    let mut prev_row: Option<&[[u8; 3]]> = None;

    for y in 0..image.height {
        let row = &image.pixels[y * image.width..(y + 1) * image.width];

        if prev_row == Some(row) {
            out.push(0x00);
            out.extend(encode_length(1)?);
            out.extend(encode_length(image.width)?);
        } else {
            encode_row_runs(row, &mut out)?;
        }

        prev_row = Some(row);
    }

    out.push(0x00);
    out.extend(encode_length(1)?);
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

/// Decode an ERLE byte stream into an image of the given dimensions.
///
/// # Errors
///
/// Returns [`CodecError::Truncated`] if the stream ends mid-token,
/// [`CodecError::NoPreviousLine`] if a copy-from-previous-line token
/// appears on the first scanline, [`CodecError::NotTerminated`] if the
/// stream does not end in a `0x00` byte, or [`CodecError::RowOverflow`] if a
/// run, copy, or literal token claims more pixels than remain on the row.
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
                pos += 1;
                let tag = decode_length(bytes, &mut pos)?;
                match tag {
                    0 => break,
                    1 => {
                        let count = decode_length(bytes, &mut pos)?;
                        if count == 0 {
                            break;
                        }
                        if y == 0 {
                            return Err(CodecError::NoPreviousLine);
                        }
                        if x + count > width {
                            return Err(CodecError::RowOverflow { x, run_len: count, width });
                        }
                        for i in 0..count {
                            pixels[y * width + x + i] = pixels[(y - 1) * width + x + i];
                        }
                        x += count;
                    },
                    literal_count => {
                        if x + literal_count > width {
                            return Err(CodecError::RowOverflow { x, run_len: literal_count, width });
                        }
                        for i in 0..literal_count {
                            let b = *bytes.get(pos).ok_or(CodecError::Truncated)?;
                            let g = *bytes.get(pos + 1).ok_or(CodecError::Truncated)?;
                            let r = *bytes.get(pos + 2).ok_or(CodecError::Truncated)?;
                            pos += 3;
                            pixels[y * width + x + i] = [r, g, b];
                        }
                        x += literal_count;
                    },
                }
            } else {
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

    fn solid(width: usize, height: usize, value: [u8; 3]) -> RgbImage {
        RgbImage { width, height, pixels: vec![value; width * height] }
    }

    #[test]
    fn stream_always_ends_in_zero() {
        let encoded = encode(&solid(8, 1, [9, 9, 9])).unwrap();
        assert_eq!(*encoded.last().unwrap(), 0x00);
    }

    #[test]
    fn solid_image_round_trips() {
        let image = solid(16, 4, [5, 6, 7]);
        let encoded = encode(&image).unwrap();
        let decoded = decode(16, 4, &encoded).unwrap();
        assert_eq!(decoded, image);
    }

    #[test]
    fn checkerboard_round_trips() {
        let image = checkerboard(10, 5);
        let encoded = encode(&image).unwrap();
        let decoded = decode(10, 5, &encoded).unwrap();
        assert_eq!(decoded, image);
    }

    #[test]
    fn repeated_row_uses_copy_from_previous_line() {
        let image = solid(12, 3, [1, 2, 3]);
        let encoded = encode(&image).unwrap();
        // Row 0: one run token (non-zero first byte). Rows 1,2: copy tokens.
        assert!(encoded.len() < 12 * 3 * 4, "repeated rows should be cheaper than per-pixel runs");
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

    #[test]
    fn decode_rejects_literal_run_longer_than_row() {
        // 0x00, length-encoding of 2 (literal tag), claiming 2 pixels on a
        // 1-wide row; rejected before any pixel bytes are read.
        let err = decode(1, 1, &[0x00, 2, 9, 9, 9]).unwrap_err();
        assert_eq!(err, CodecError::RowOverflow { x: 0, run_len: 2, width: 1 });
    }

    #[test]
    fn decode_rejects_copy_longer_than_row() {
        let image = solid(1, 2, [1, 2, 3]);
        let mut encoded = encode(&image).unwrap();
        // Corrupt the copy-from-previous-line count on row 1 from 1 to 2.
        let copy_count_pos = encoded.iter().position(|&b| b == 0x00).unwrap() + 2;
        encoded[copy_count_pos] = 2;
        let err = decode(1, 2, &encoded).unwrap_err();
        assert_eq!(err, CodecError::RowOverflow { x: 0, run_len: 2, width: 1 });
    }
}
