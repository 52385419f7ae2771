//! Pattern display LUT entry (the `MBOX_DATA` record).
//!
//! The wire payload is 12 bytes, not the 9 a loose reading of the
//! programmer's guide might suggest — see `DESIGN.md` for the resolved
//! discrepancy. Layout: `sequence_position(2) + exposure_us(3) + misc(1) +
//! dark_time_us(3) + trig2(1) + stored_image_index(1) +
//! stored_image_bit_index*8(1)`.

use crate::error::ProtoError;

/// One entry of the controller's pattern display look-up table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LutEntry {
    /// Position of this entry within the displayed sequence.
    pub sequence_position: u16,
    /// Exposure time for this pattern, in microseconds (24-bit on the wire).
    pub exposure_us: u32,
    /// Clear the DMD immediately after the trigger fires.
    pub clear_after_trigger: bool,
    /// Bit depth selector (3 bits; `0` for 1-bit binary patterns).
    pub bit_depth: u8,
    /// LED select field (3 bits; illumination is not driven by this entry,
    /// so this is always the reference driver's constant "disabled" value
    /// unless the caller overrides it).
    pub led_select: u8,
    /// Wait for an external trigger before displaying this pattern.
    pub wait_for_trigger: bool,
    /// Dark time after this pattern's exposure, in microseconds.
    pub dark_time_us: u16,
    /// Disable trigger-out-2 for this pattern.
    pub disable_trig2: bool,
    /// Index into the uploaded bitmap images this entry refers to.
    pub stored_image_index: u8,
    /// Which of the up to 24 combined bit-planes within the stored image
    /// this entry selects (0-31; encoded on the wire as `8 * value`).
    pub stored_image_bit_index: u8,
}

/// LED select value the reference driver always uses: illumination is
/// controlled elsewhere, so every LED channel is marked disabled here.
pub const LED_SELECT_DISABLED: u8 = 0b100;

impl LutEntry {
    /// Encode this entry into its 12-byte `MBOX_DATA` wire representation.
    ///
    /// # Errors
    ///
    /// Returns [`ProtoError::FieldOutOfRange`] if `bit_depth`/`led_select`
    /// don't fit in 3 bits, or if `stored_image_bit_index` would overflow a
    /// byte once left-shifted by 3 (i.e. is greater than 31).
    pub fn encode(&self) -> Result<[u8; 12], ProtoError> {
        if self.bit_depth > 0b111 {
            return Err(ProtoError::FieldOutOfRange {
                field: "bit_depth",
                value: i64::from(self.bit_depth),
                max: 0b111,
            });
        }
        if self.led_select > 0b111 {
            return Err(ProtoError::FieldOutOfRange {
                field: "led_select",
                value: i64::from(self.led_select),
                max: 0b111,
            });
        }
        if self.stored_image_bit_index > 31 {
            return Err(ProtoError::FieldOutOfRange {
                field: "stored_image_bit_index",
                value: i64::from(self.stored_image_bit_index),
                max: 31,
            });
        }

        let exposure = self.exposure_us.to_le_bytes();
        let dark = self.dark_time_us.to_le_bytes();
        let seq = self.sequence_position.to_le_bytes();

        let misc = (u8::from(self.wait_for_trigger) << 7)
            | ((self.led_select & 0b111) << 4)
            | ((self.bit_depth & 0b111) << 1)
            | u8::from(self.clear_after_trigger);

        Ok([
            seq[0],
            seq[1],
            exposure[0],
            exposure[1],
            exposure[2],
            misc,
            dark[0],
            dark[1],
            0x00,
            u8::from(!self.disable_trig2),
            self.stored_image_index,
            self.stored_image_bit_index * 8,
        ])
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> LutEntry {
        LutEntry {
            sequence_position: 3,
            exposure_us: 105,
            clear_after_trigger: false,
            bit_depth: 0,
            led_select: LED_SELECT_DISABLED,
            wait_for_trigger: false,
            dark_time_us: 0,
            disable_trig2: false,
            stored_image_index: 2,
            stored_image_bit_index: 5,
        }
    }

    #[test]
    fn encodes_to_twelve_bytes() {
        let bytes = sample().encode().unwrap();
        assert_eq!(bytes.len(), 12);
    }

    #[test]
    fn sequence_position_is_little_endian() {
        let mut entry = sample();
        entry.sequence_position = 0x0102;
        let bytes = entry.encode().unwrap();
        assert_eq!([bytes[0], bytes[1]], [0x02, 0x01]);
    }

    #[test]
    fn stored_image_bit_index_is_shifted_left_by_three() {
        let mut entry = sample();
        entry.stored_image_bit_index = 4;
        let bytes = entry.encode().unwrap();
        assert_eq!(bytes[11], 32);
    }

    #[test]
    fn rejects_bit_index_that_would_overflow_a_byte() {
        let mut entry = sample();
        entry.stored_image_bit_index = 32;
        assert!(entry.encode().is_err());
    }

    #[test]
    fn misc_byte_places_wait_for_trigger_at_msb() {
        let mut entry = sample();
        entry.wait_for_trigger = true;
        entry.led_select = 0;
        entry.bit_depth = 0;
        entry.clear_after_trigger = false;
        let bytes = entry.encode().unwrap();
        assert_eq!(bytes[5], 0b1000_0000);
    }

    #[test]
    fn misc_byte_places_clear_after_trigger_at_lsb() {
        let mut entry = sample();
        entry.wait_for_trigger = false;
        entry.led_select = 0;
        entry.bit_depth = 0;
        entry.clear_after_trigger = true;
        let bytes = entry.encode().unwrap();
        assert_eq!(bytes[5], 0b0000_0001);
    }

    #[test]
    fn trig2_byte_is_inverted_disable_flag() {
        let mut entry = sample();
        entry.disable_trig2 = true;
        assert_eq!(entry.encode().unwrap()[9], 0x00);
        entry.disable_trig2 = false;
        assert_eq!(entry.encode().unwrap()[9], 0x01);
    }
}
