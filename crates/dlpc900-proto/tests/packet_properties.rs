//! Property-based tests for command/response packet encoding.

use bytes::Bytes;
use dlpc900_proto::{CommandPacket, FlagByte, Opcode, ResponsePacket};
use proptest::prelude::*;

fn arbitrary_opcode() -> impl Strategy<Value = Opcode> {
    proptest::sample::select(Opcode::all())
}

#[test]
fn prop_command_header_fields_round_trip_through_encode() {
    proptest!(|(
        sequence in any::<u8>(),
        opcode in arbitrary_opcode(),
        payload in prop::collection::vec(any::<u8>(), 0..500),
    )| {
        let cmd = CommandPacket::write(sequence, opcode, Bytes::from(payload.clone()));
        let encoded = cmd.encode().expect("encode should succeed for in-range payloads");

        prop_assert_eq!(encoded[1], sequence, "sequence byte mismatch");
        let declared_len = u16::from_le_bytes([encoded[2], encoded[3]]) as usize;
        prop_assert_eq!(declared_len, payload.len() + 2, "length field should cover opcode + payload");
        let decoded_opcode = u16::from_le_bytes([encoded[4], encoded[5]]);
        prop_assert_eq!(decoded_opcode, opcode.to_u16(), "opcode mismatch");
        prop_assert_eq!(&encoded[6..], &payload[..], "payload mismatch");
    });
}

#[test]
fn prop_response_decode_recovers_payload_for_any_valid_length() {
    proptest!(|(
        flag_bits in any::<u8>(),
        sequence in any::<u8>(),
        payload in prop::collection::vec(any::<u8>(), 0..512),
    )| {
        let mut buf = Vec::with_capacity(4 + payload.len());
        buf.push(flag_bits);
        buf.push(sequence);
        buf.extend_from_slice(&(payload.len() as u16).to_le_bytes());
        buf.extend_from_slice(&payload);

        let decoded = ResponsePacket::decode(&buf).expect("decode should succeed");
        prop_assert_eq!(decoded.flag, FlagByte::from_byte(flag_bits));
        prop_assert_eq!(decoded.sequence, sequence);
        prop_assert_eq!(&decoded.payload[..], &payload[..]);
    });
}
