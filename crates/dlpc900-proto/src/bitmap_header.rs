//! 48-byte header prefixed to each compressed pattern bitmap stream.

/// Bitmap compression scheme, as encoded in the bitmap header's encoding
/// byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMode {
    /// Uncompressed 24-bit RGB.
    None,
    /// Run-length encoding.
    Rle,
    /// Enhanced run-length encoding.
    Erle,
}

impl CompressionMode {
    /// The byte value the controller expects for this mode.
    #[must_use]
    pub const fn to_byte(self) -> u8 {
        match self {
            Self::None => 0x00,
            Self::Rle => 0x01,
            Self::Erle => 0x02,
        }
    }
}

/// Fixed-size header that precedes a compressed (or raw) bitmap's bytes in
/// a `PATMEM_LOAD_DATA_*` stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapHeader {
    /// Bitmap width in pixels (the controller-local width: half the panel
    /// width on dual-controller panels, full width otherwise).
    pub width: u16,
    /// Bitmap height in pixels (always the panel's full height).
    pub height: u16,
    /// Length, in bytes, of the compressed (or raw) pixel stream that
    /// follows this header.
    pub num_encoded_bytes: u32,
    /// Compression scheme used for the pixel stream.
    pub compression: CompressionMode,
}

/// Magic signature ("Spld") every bitmap header begins with.
pub const SIGNATURE: [u8; 4] = [0x53, 0x70, 0x6C, 0x64];

/// Encoded size of [`BitmapHeader`] on the wire.
pub const SIZE: usize = 48;

impl BitmapHeader {
    /// Encode this header to its 48-byte wire representation.
    #[must_use]
    pub fn encode(&self) -> [u8; SIZE] {
        let mut buf = [0u8; SIZE];
        buf[0..4].copy_from_slice(&SIGNATURE);
        buf[4..6].copy_from_slice(&self.width.to_le_bytes());
        buf[6..8].copy_from_slice(&self.height.to_le_bytes());
        buf[8..12].copy_from_slice(&self.num_encoded_bytes.to_le_bytes());
        buf[12..20].copy_from_slice(&[0xFF; 8]);
        buf[20..24].copy_from_slice(&[0x00; 4]);
        buf[24] = 0x01;
        buf[25] = self.compression.to_byte();
        buf[26] = 0x01;
        // buf[27..29] left as the reserved zero bytes.
        buf[29] = 0x01;
        // buf[30..48] left as the reserved zero tail.
        buf
    }
}
