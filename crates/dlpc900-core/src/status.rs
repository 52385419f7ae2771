//! Status bitfields, firmware identity, and display-mode types.

use dlpc900_proto::{HARDWARE_STATUS_BITS, MAIN_STATUS_BITS};

use crate::error::DriverError;

/// One byte-wide status register, decoded into the flags it has set.
///
/// `bits` is the raw byte as read from the controller; `set` is the subset
/// of `table` whose bit was `1`, in bit order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusFlags {
    /// The raw status byte.
    pub bits: u8,
    /// Names of the flags that were set, lowest bit first.
    pub set: Vec<&'static str>,
}

fn decode_bits(byte: u8, table: &[&'static str]) -> StatusFlags {
    let set = table
        .iter()
        .enumerate()
        .filter(|(i, _)| byte & (1 << i) != 0)
        .map(|(_, name)| *name)
        .collect();
    StatusFlags { bits: byte, set }
}

/// Decode `Get_Main_Status`'s payload byte.
#[must_use]
pub fn decode_main_status(byte: u8) -> StatusFlags {
    decode_bits(byte, &MAIN_STATUS_BITS)
}

/// Decode `Get_Hardware_Status`'s payload byte.
#[must_use]
pub fn decode_hardware_status(byte: u8) -> StatusFlags {
    decode_bits(byte, &HARDWARE_STATUS_BITS)
}

/// Bit names for the System Status byte (`Get_System_Status`), bit 0 first.
pub const SYSTEM_STATUS_BITS: [&str; 1] = ["internal memory test passed"];

/// Decode `Get_System_Status`'s payload byte.
#[must_use]
pub fn decode_system_status(byte: u8) -> StatusFlags {
    decode_bits(byte, &SYSTEM_STATUS_BITS)
}

/// The controller's firmware version, as four independently-versioned
/// components (application, API, software configuration, sequence
/// configuration), each packed `major.minor.patch` into one little-endian
/// `u32` with the patch byte lowest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FirmwareVersion {
    /// Application image version.
    pub app: u32,
    /// DLPC900 API version.
    pub api: u32,
    /// Software configuration revision.
    pub software_config: u32,
    /// Sequence configuration revision.
    pub sequence_config: u32,
}

impl FirmwareVersion {
    pub(crate) fn parse(payload: &[u8]) -> Result<Self, DriverError> {
        const LEN: usize = 16;
        if payload.len() < LEN {
            return Err(DriverError::UnexpectedPayloadLength { expected: LEN, got: payload.len() });
        }
        let word = |offset: usize| -> u32 {
            u32::from_le_bytes(payload[offset..offset + 4].try_into().unwrap_or([0; 4]))
        };
        Ok(Self {
            app: word(0),
            api: word(4),
            software_config: word(8),
            sequence_config: word(12),
        })
    }
}

/// `Disp_Mode`: which source the controller displays and how it gets its
/// pattern data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// Display the live external video input.
    Video,
    /// Display a pattern sequence pre-stored in flash.
    PreStoredPatternSequence,
    /// Display a pattern sequence derived from the video input.
    VideoPatternSequence,
    /// Display a pattern sequence uploaded over USB ("on the fly").
    OnTheFlyPatternSequence,
}

impl DisplayMode {
    /// Encode to the byte `Disp_Mode` expects on the wire.
    #[must_use]
    pub const fn to_u8(self) -> u8 {
        match self {
            Self::Video => 0x00,
            Self::PreStoredPatternSequence => 0x01,
            Self::VideoPatternSequence => 0x02,
            Self::OnTheFlyPatternSequence => 0x03,
        }
    }

    /// Decode a `Disp_Mode` payload byte.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::UnexpectedPayloadLength`] if `value` is not
    /// one of the four modes the controller defines.
    pub fn from_u8(value: u8) -> Result<Self, DriverError> {
        match value {
            0x00 => Ok(Self::Video),
            0x01 => Ok(Self::PreStoredPatternSequence),
            0x02 => Ok(Self::VideoPatternSequence),
            0x03 => Ok(Self::OnTheFlyPatternSequence),
            other => Err(DriverError::UnexpectedPayloadLength { expected: 0, got: other as usize }),
        }
    }
}

/// Configuration for one trigger input or output line.
///
/// `delay_us` is clamped by the controller to +/-20000us; [`TriggerConfig::validate`]
/// rejects out-of-range values before they are ever sent on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerConfig {
    /// `true` for active-high/rising-edge polarity.
    pub active_high: bool,
    /// Delay from the trigger edge to the pattern's exposure start, in
    /// microseconds. Negative values trigger before exposure begins.
    pub delay_us: i32,
    /// Pulse width, in microseconds.
    pub pulse_width_us: u16,
}

impl TriggerConfig {
    /// Maximum magnitude of [`TriggerConfig::delay_us`] the controller accepts.
    pub const MAX_DELAY_US: i32 = 20_000;

    /// Check `delay_us` against the controller's representable range.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::TriggerDelayOutOfRange`] if the magnitude of
    /// `delay_us` exceeds [`TriggerConfig::MAX_DELAY_US`].
    pub fn validate(&self) -> Result<(), DriverError> {
        if self.delay_us.unsigned_abs() > Self::MAX_DELAY_US as u32 {
            return Err(DriverError::TriggerDelayOutOfRange {
                value: self.delay_us,
                max: Self::MAX_DELAY_US,
            });
        }
        Ok(())
    }

    pub(crate) fn encode(&self) -> [u8; 5] {
        let delay = self.delay_us.to_le_bytes();
        let width = self.pulse_width_us.to_le_bytes();
        [self.active_high as u8, delay[0], delay[1], width[0], width[1]]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn decode_main_status_lists_set_bits_only() {
        let flags = decode_main_status(0b0000_0101);
        assert_eq!(flags.bits, 0b0000_0101);
        assert_eq!(flags.set, vec!["DMD micromirrors are parked", "video is frozen"]);
    }

    #[test]
    fn decode_hardware_status_empty_when_zero() {
        let flags = decode_hardware_status(0);
        assert!(flags.set.is_empty());
    }

    #[test]
    fn display_mode_round_trips_through_wire_value() {
        for mode in [
            DisplayMode::Video,
            DisplayMode::PreStoredPatternSequence,
            DisplayMode::VideoPatternSequence,
            DisplayMode::OnTheFlyPatternSequence,
        ] {
            assert_eq!(DisplayMode::from_u8(mode.to_u8()).unwrap(), mode);
        }
    }

    #[test]
    fn firmware_version_parses_four_little_endian_words() {
        let mut payload = vec![0u8; 16];
        payload[0..4].copy_from_slice(&1u32.to_le_bytes());
        payload[12..16].copy_from_slice(&42u32.to_le_bytes());
        let version = FirmwareVersion::parse(&payload).unwrap();
        assert_eq!(version.app, 1);
        assert_eq!(version.sequence_config, 42);
    }

    #[test]
    fn trigger_config_rejects_delay_past_20000us() {
        let cfg = TriggerConfig { active_high: true, delay_us: 20_001, pulse_width_us: 100 };
        assert_eq!(
            cfg.validate(),
            Err(DriverError::TriggerDelayOutOfRange { value: 20_001, max: 20_000 })
        );
    }

    #[test]
    fn trigger_config_accepts_boundary_delay() {
        let cfg = TriggerConfig { active_high: false, delay_us: -20_000, pulse_width_us: 0 };
        assert!(cfg.validate().is_ok());
    }
}
