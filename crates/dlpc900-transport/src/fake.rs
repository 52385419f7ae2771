//! An in-memory [`HidTransport`] double for tests.
//!
//! Queue up raw response bytes with [`FakeHid::queue_response`], then hand
//! a `&mut FakeHid` to anything generic over [`HidTransport`]. Every
//! command written is also reassembled and recorded in
//! [`FakeHid::command_log`], so orchestrator tests can assert on exactly
//! which commands were sent and in what order without decoding raw HID
//! reports themselves.

use std::{collections::VecDeque, time::Duration};

use dlpc900_proto::{CommandPacket, HID_REPORT_LEN, Opcode};

use crate::{error::TransportError, transport::HidTransport};

/// A deterministic stand-in for real HID hardware.
#[derive(Debug, Default)]
pub struct FakeHid {
    needs_prefix: bool,
    reports_out: Vec<Vec<u8>>,
    reply_reports: VecDeque<Vec<u8>>,
    write_scratch: Vec<u8>,
    command_log: Vec<CommandPacket>,
    fail_next_writes: usize,
}

impl FakeHid {
    /// Create a fake transport that behaves like platforms requiring a
    /// leading report-id byte (the common case).
    #[must_use]
    pub fn new() -> Self {
        Self { needs_prefix: true, ..Self::default() }
    }

    /// Raw reports written so far, including the report-id prefix if any.
    #[must_use]
    pub fn sent_reports(&self) -> &[Vec<u8>] {
        &self.reports_out
    }

    /// Commands reassembled from writes so far, in order.
    #[must_use]
    pub fn command_log(&self) -> &[CommandPacket] {
        &self.command_log
    }

    /// Make the next `count` calls to [`HidTransport::write_report`] fail
    /// with [`TransportError::Io`], to exercise a caller's retry path.
    pub fn fail_next_writes(&mut self, count: usize) {
        self.fail_next_writes = count;
    }

    /// Queue a response to be returned by the next `read_response` calls,
    /// split into 64-byte reports (with a report-id prefix if configured).
    pub fn queue_response(&mut self, flag_byte: u8, sequence: u8, payload: &[u8]) {
        let mut body = Vec::with_capacity(4 + payload.len());
        body.push(flag_byte);
        body.push(sequence);
        body.extend_from_slice(&(payload.len() as u16).to_le_bytes());
        body.extend_from_slice(payload);

        let padded_len = body.len().div_ceil(HID_REPORT_LEN) * HID_REPORT_LEN;
        body.resize(padded_len, 0);

        for chunk in body.chunks(HID_REPORT_LEN) {
            let mut report = Vec::with_capacity(chunk.len() + 1);
            if self.needs_prefix {
                report.push(0x00);
            }
            report.extend_from_slice(chunk);
            self.reply_reports.push_back(report);
        }
    }

    fn try_decode_pending_command(&mut self) {
        const MIN_HEADER: usize = 6; // flag, seq, len_lsb, len_msb, op_lsb, op_msb
        if self.write_scratch.len() < MIN_HEADER {
            return;
        }

        let flag = self.write_scratch[0];
        let sequence = self.write_scratch[1];
        let len_field = u16::from_le_bytes([self.write_scratch[2], self.write_scratch[3]]) as usize;
        let Some(payload_len) = len_field.checked_sub(2) else { return };
        let total = MIN_HEADER + payload_len;
        if self.write_scratch.len() < total {
            return;
        }

        let opcode_raw = u16::from_le_bytes([self.write_scratch[4], self.write_scratch[5]]);
        if let Ok(opcode) = Opcode::from_u16(opcode_raw) {
            let payload = self.write_scratch[MIN_HEADER..total].to_vec();
            self.command_log.push(CommandPacket {
                flag: dlpc900_proto::FlagByte::from_byte(flag),
                sequence,
                opcode,
                payload: payload.into(),
            });
        }
        self.write_scratch.drain(..total);
    }
}

impl HidTransport for FakeHid {
    fn write_report(&mut self, report: &[u8]) -> Result<(), TransportError> {
        if self.fail_next_writes > 0 {
            self.fail_next_writes -= 1;
            return Err(TransportError::Io("simulated write failure".to_string()));
        }

        self.reports_out.push(report.to_vec());

        let body = if self.needs_prefix && !report.is_empty() { &report[1..] } else { report };
        self.write_scratch.extend_from_slice(body);
        self.try_decode_pending_command();

        Ok(())
    }

    fn read_report(&mut self, _timeout: Duration) -> Result<Vec<u8>, TransportError> {
        self.reply_reports.pop_front().ok_or(TransportError::NoReplyQueued)
    }

    fn needs_report_id_prefix(&self) -> bool {
        self.needs_prefix
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn queued_response_is_returned_in_report_sized_chunks() {
        let mut fake = FakeHid::new();
        fake.queue_response(0x00, 0x01, &[1, 2, 3]);
        let report = fake.read_report(Duration::from_millis(1)).unwrap();
        assert_eq!(report.len(), HID_REPORT_LEN + 1);
    }

    #[test]
    fn reading_with_no_queued_reply_errors() {
        let mut fake = FakeHid::new();
        assert!(matches!(
            fake.read_report(Duration::from_millis(1)),
            Err(TransportError::NoReplyQueued)
        ));
    }
}
