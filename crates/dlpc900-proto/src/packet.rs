//! Command/response packet framing.
//!
//! A command packet is a 4-byte flag/sequence/length header, a 2-byte
//! little-endian opcode, and a payload. A response packet is the 4-byte
//! header followed directly by its payload (the opcode is not echoed back;
//! the caller already knows which command it sent). Splitting either form
//! across 64-byte HID reports is the transport's job, not this crate's.

use bytes::{BufMut, Bytes, BytesMut};

use crate::{error::ProtoError, opcode::Opcode};

/// Size of one USB HID report used by the controller.
pub const HID_REPORT_LEN: usize = 64;

/// Largest payload the controller accepts in a single command, after the
/// 4-byte header and 2-byte opcode have been subtracted from one chunk's
/// worth of bookkeeping. Longer payloads (bitmap streaming) are split by
/// the caller into chunks of at most this size, each framed as its own
/// command.
pub const MAX_COMMAND_PAYLOAD: usize = 504;

/// The three flag bits the controller defines on the header's top byte.
///
/// Bit 7 is `read_transaction`, bit 6 is `host_requests_reply`, bit 5 is
/// `error`. The remaining bits are reserved/destination and always zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlagByte {
    /// Set when this is a read (as opposed to write) transaction.
    pub read_transaction: bool,
    /// Set by the host to request a reply to a write command.
    pub host_requests_reply: bool,
    /// Set by the controller on a response that carries an error.
    pub error: bool,
}

impl FlagByte {
    /// Decode the three known bits out of a raw flag byte.
    #[must_use]
    pub const fn from_byte(byte: u8) -> Self {
        Self {
            read_transaction: byte & 0x80 != 0,
            host_requests_reply: byte & 0x40 != 0,
            error: byte & 0x20 != 0,
        }
    }

    /// Encode back to the raw byte the controller expects.
    #[must_use]
    pub const fn to_byte(self) -> u8 {
        (self.read_transaction as u8) << 7
            | (self.host_requests_reply as u8) << 6
            | (self.error as u8) << 5
    }
}

/// A command sent to the controller: header + opcode + payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandPacket {
    /// Transaction flags.
    pub flag: FlagByte,
    /// Sequence byte, echoed back by some responses.
    pub sequence: u8,
    /// Command opcode.
    pub opcode: Opcode,
    /// Command payload (not including the opcode itself).
    pub payload: Bytes,
}

impl CommandPacket {
    /// Build a write command with no reply requested.
    #[must_use]
    pub fn write(sequence: u8, opcode: Opcode, payload: impl Into<Bytes>) -> Self {
        Self {
            flag: FlagByte { read_transaction: false, host_requests_reply: false, error: false },
            sequence,
            opcode,
            payload: payload.into(),
        }
    }

    /// Build a read command.
    #[must_use]
    pub fn read(sequence: u8, opcode: Opcode) -> Self {
        Self {
            flag: FlagByte { read_transaction: true, host_requests_reply: false, error: false },
            sequence,
            opcode,
            payload: Bytes::new(),
        }
    }

    /// Encode the logical command buffer: `[flag, seq, len_lsb, len_msb,
    /// op_lsb, op_msb, ...payload]`. `len` covers the opcode and payload
    /// together, matching `send_command`'s `len_payload = len(data) + 2`.
    ///
    /// # Errors
    ///
    /// Returns [`ProtoError::PayloadTooLarge`] if the payload plus the
    /// 2-byte opcode would overflow the 16-bit length field.
    pub fn encode(&self) -> Result<Bytes, ProtoError> {
        let len_payload = self
            .payload
            .len()
            .checked_add(2)
            .filter(|len| *len <= u16::MAX as usize)
            .ok_or(ProtoError::PayloadTooLarge { size: self.payload.len(), max: u16::MAX as usize - 2 })?;

        let mut buf = BytesMut::with_capacity(6 + self.payload.len());
        buf.put_u8(self.flag.to_byte());
        buf.put_u8(self.sequence);
        buf.put_u16_le(len_payload as u16);
        buf.put_u16_le(self.opcode.to_u16());
        buf.put_slice(&self.payload);
        Ok(buf.freeze())
    }
}

/// A response read back from the controller: header + payload (no opcode).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponsePacket {
    /// Transaction flags as reported by the controller.
    pub flag: FlagByte,
    /// Sequence byte echoed back by the controller.
    pub sequence: u8,
    /// Response payload.
    pub payload: Bytes,
}

impl ResponsePacket {
    /// Decode a reassembled response buffer (after HID-report defragmenting).
    ///
    /// # Errors
    ///
    /// Returns [`ProtoError::Truncated`] if `buf` is shorter than the 4-byte
    /// header, or [`ProtoError::PayloadLengthMismatch`] if the declared
    /// length runs past the end of `buf`.
    pub fn decode(buf: &[u8]) -> Result<Self, ProtoError> {
        const HEADER_LEN: usize = 4;
        if buf.len() < HEADER_LEN {
            return Err(ProtoError::Truncated { got: buf.len(), need: HEADER_LEN });
        }

        let flag = FlagByte::from_byte(buf[0]);
        let sequence = buf[1];
        let data_len = u16::from_le_bytes([buf[2], buf[3]]) as usize;

        let available = buf.len() - HEADER_LEN;
        if data_len > available {
            return Err(ProtoError::PayloadLengthMismatch { declared: data_len, available });
        }

        Ok(Self { flag, sequence, payload: Bytes::copy_from_slice(&buf[HEADER_LEN..HEADER_LEN + data_len]) })
    }
}
