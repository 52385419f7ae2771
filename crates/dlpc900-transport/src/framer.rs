//! Splits logical command buffers across 64-byte HID reports on the way
//! out, and reassembles response buffers on the way in.

use std::time::Duration;

use dlpc900_proto::{CommandPacket, HID_REPORT_LEN, ResponsePacket};
use tracing::trace;

use crate::{error::TransportError, transport::HidTransport};

/// Encode `cmd`, pad it to a whole number of 64-byte reports, and write it
/// to `transport` one report at a time.
///
/// # Errors
///
/// Returns [`TransportError::Protocol`] if the command can't be encoded, or
/// [`TransportError::Io`] if a write fails.
pub fn write_command(
    transport: &mut impl HidTransport,
    cmd: &CommandPacket,
) -> Result<(), TransportError> {
    let body = cmd.encode()?;

    let padded_len = body.len().div_ceil(HID_REPORT_LEN) * HID_REPORT_LEN;
    let mut padded = vec![0u8; padded_len];
    padded[..body.len()].copy_from_slice(&body);

    for chunk in padded.chunks(HID_REPORT_LEN) {
        let report = if transport.needs_report_id_prefix() {
            let mut with_id = Vec::with_capacity(chunk.len() + 1);
            with_id.push(0x00);
            with_id.extend_from_slice(chunk);
            with_id
        } else {
            chunk.to_vec()
        };
        trace!(bytes = report.len(), "writing HID report");
        transport.write_report(&report)?;
    }

    Ok(())
}

/// Read and reassemble one response, blocking up to `timeout` across all
/// reports it takes to receive it.
///
/// # Errors
///
/// Returns [`TransportError::Timeout`] if a report doesn't arrive in time,
/// or [`TransportError::Protocol`] if the reassembled buffer doesn't decode.
pub fn read_response(
    transport: &mut impl HidTransport,
    timeout: Duration,
) -> Result<ResponsePacket, TransportError> {
    const HEADER_LEN: usize = 4;

    let mut buf = Vec::with_capacity(HID_REPORT_LEN);
    let mut needed: Option<usize> = None;

    loop {
        let mut report = transport.read_report(timeout)?;
        if transport.needs_report_id_prefix() && !report.is_empty() {
            report.remove(0);
        }
        trace!(bytes = report.len(), "read HID report");
        buf.extend_from_slice(&report);

        if needed.is_none() && buf.len() >= HEADER_LEN {
            let data_len = u16::from_le_bytes([buf[2], buf[3]]) as usize;
            needed = Some(HEADER_LEN + data_len);
        }

        if let Some(needed) = needed {
            if buf.len() >= needed {
                return Ok(ResponsePacket::decode(&buf[..needed])?);
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use dlpc900_proto::Opcode;

    use super::*;
    use crate::fake::FakeHid;

    #[test]
    fn write_command_pads_to_report_boundary() {
        let mut fake = FakeHid::new();
        let cmd = CommandPacket::write(0, Opcode::PatternConfig, vec![0u8; 10]);
        write_command(&mut fake, &cmd).unwrap();
        let sent = fake.sent_reports();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].len(), HID_REPORT_LEN + 1); // + report-id prefix
    }

    #[test]
    fn write_command_spans_multiple_reports_for_large_payloads() {
        let mut fake = FakeHid::new();
        let cmd = CommandPacket::write(0, Opcode::PatmemLoadDataMaster, vec![0u8; 200]);
        write_command(&mut fake, &cmd).unwrap();
        assert_eq!(fake.sent_reports().len(), 4);
    }

    #[test]
    fn read_response_reassembles_multi_report_payload() {
        let mut fake = FakeHid::new();
        let payload = vec![7u8; 120];
        fake.queue_response(0x00, 0x01, &payload);
        let resp = read_response(&mut fake, Duration::from_millis(100)).unwrap();
        assert_eq!(&resp.payload[..], &payload[..]);
        assert_eq!(resp.sequence, 0x01);
    }
}
