//! Command opcodes and the controller's error/status string tables.
//!
//! Values are taken from the DLPC900 programmer's guide as implemented by
//! the reference driver; see `command_dict` / `err_dictionary` /
//! `status_strs` / `hw_status_strs` in the original Python source.

use crate::error::ProtoError;

/// A 16-bit USB command opcode understood by the DLPC900 firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Opcode {
    /// Read the last error code recorded by the controller.
    ReadErrorCode,
    /// Read the human-readable description of the last error.
    ReadErrorDescription,
    /// Read the hardware status bitfield.
    GetHardwareStatus,
    /// Read the system status bitfield.
    GetSystemStatus,
    /// Read the main status bitfield.
    GetMainStatus,
    /// Read the firmware version.
    GetFirmwareVersion,
    /// Read the firmware type/tag string.
    GetFirmwareType,
    /// Read the name of the active firmware batch file.
    GetFirmwareBatchFileName,
    /// Execute a firmware batch file.
    ExecuteFirmwareBatchFile,
    /// Set the delay between firmware batch file commands.
    SetFirmwareBatchCommandDelayTime,
    /// Start, stop, or pause the pattern sequence.
    PatternStartStop,
    /// Read or write the controller's display mode.
    DisplayMode,
    /// Read or write the pattern display LUT definition (`MBOX_DATA`).
    MailboxData,
    /// Read or write the pattern display LUT configuration.
    PatternConfig,
    /// Initialize a pattern bitmap load to the primary/master controller.
    PatmemLoadInitMaster,
    /// Stream pattern bitmap data to the primary/master controller.
    PatmemLoadDataMaster,
    /// Initialize a pattern bitmap load to the secondary controller.
    PatmemLoadInitSecondary,
    /// Stream pattern bitmap data to the secondary controller.
    PatmemLoadDataSecondary,
    /// Configure trigger output 1.
    TrigOut1Control,
    /// Configure trigger output 2.
    TrigOut2Control,
    /// Configure trigger input 1.
    TrigIn1Control,
    /// Configure trigger input 2.
    TrigIn2Control,
}

impl Opcode {
    /// The 16-bit value sent on the wire for this opcode.
    #[must_use]
    pub const fn to_u16(self) -> u16 {
        match self {
            Self::ReadErrorCode => 0x0100,
            Self::ReadErrorDescription => 0x0101,
            Self::GetHardwareStatus => 0x1A0A,
            Self::GetSystemStatus => 0x1A0B,
            Self::GetMainStatus => 0x1A0C,
            Self::GetFirmwareVersion => 0x0205,
            Self::GetFirmwareType => 0x0206,
            Self::GetFirmwareBatchFileName => 0x1A14,
            Self::ExecuteFirmwareBatchFile => 0x1A15,
            Self::SetFirmwareBatchCommandDelayTime => 0x1A16,
            Self::PatternStartStop => 0x1A24,
            Self::DisplayMode => 0x1A1B,
            Self::MailboxData => 0x1A34,
            Self::PatternConfig => 0x1A31,
            Self::PatmemLoadInitMaster => 0x1A2A,
            Self::PatmemLoadDataMaster => 0x1A2B,
            Self::PatmemLoadInitSecondary => 0x1A2C,
            Self::PatmemLoadDataSecondary => 0x1A2D,
            Self::TrigOut1Control => 0x1A1D,
            Self::TrigOut2Control => 0x1A1E,
            Self::TrigIn1Control => 0x1A35,
            Self::TrigIn2Control => 0x1A36,
        }
    }

    /// All opcodes known to this driver, for exhaustive round-trip tests.
    #[must_use]
    pub const fn all() -> &'static [Opcode] {
        &[
            Self::ReadErrorCode,
            Self::ReadErrorDescription,
            Self::GetHardwareStatus,
            Self::GetSystemStatus,
            Self::GetMainStatus,
            Self::GetFirmwareVersion,
            Self::GetFirmwareType,
            Self::GetFirmwareBatchFileName,
            Self::ExecuteFirmwareBatchFile,
            Self::SetFirmwareBatchCommandDelayTime,
            Self::PatternStartStop,
            Self::DisplayMode,
            Self::MailboxData,
            Self::PatternConfig,
            Self::PatmemLoadInitMaster,
            Self::PatmemLoadDataMaster,
            Self::PatmemLoadInitSecondary,
            Self::PatmemLoadDataSecondary,
            Self::TrigOut1Control,
            Self::TrigOut2Control,
            Self::TrigIn1Control,
            Self::TrigIn2Control,
        ]
    }

    /// Recover an [`Opcode`] from its wire value.
    ///
    /// # Errors
    ///
    /// Returns [`ProtoError::UnknownOpcode`] if `value` is not one of the
    /// opcodes this driver knows about.
    pub fn from_u16(value: u16) -> Result<Self, ProtoError> {
        Self::all()
            .iter()
            .copied()
            .find(|op| op.to_u16() == value)
            .ok_or(ProtoError::UnknownOpcode(value))
    }
}

/// Look up the controller's textual description for an error code.
///
/// Matches `err_dictionary` in the reference driver. Returns `None` for
/// codes the firmware has never been documented to emit.
#[must_use]
pub fn error_description(code: u8) -> Option<&'static str> {
    match code {
        0 => Some("no error"),
        1 => Some("batch file checksum error"),
        2 => Some("device failure"),
        3 => Some("invalid command number"),
        4 => Some("incompatible controller/dmd"),
        5 => Some("command not allowed in current mode"),
        6 => Some("invalid command parameter"),
        7 => Some("item referred by the parameter is not present"),
        8 => Some("out of resource (RAM/flash)"),
        9 => Some("invalid BMP compression type"),
        10 => Some("pattern bit number out of range"),
        11 => Some("pattern BMP not present in flash"),
        12 => Some("pattern dark time is out of range"),
        13 => Some("signal delay parameter is out of range"),
        14 => Some("pattern exposure time is out of range"),
        15 => Some("pattern number is out of range"),
        16 => Some("invalid pattern definition"),
        17 => Some("pattern image memory address is out of range"),
        255 => Some("internal error"),
        _ => None,
    }
}

/// Bit names for the Main Status byte (`Get_Main_Status`), bit 0 first.
pub const MAIN_STATUS_BITS: [&str; 8] = [
    "DMD micromirrors are parked",
    "sequencer is running normally",
    "video is frozen",
    "external video source is locked",
    "port 1 syncs valid",
    "port 2 syncs valid",
    "reserved",
    "reserved",
];

/// Bit names for the Hardware Status byte (`Get_Hardware_Status`), bit 0
/// first.
pub const HARDWARE_STATUS_BITS: [&str; 8] = [
    "internal initialization success",
    "incompatible controller or DMD",
    "DMD reset controller error",
    "forced swap error",
    "slave controller present",
    "reserved",
    "sequence abort status error",
    "sequencer error",
];

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn opcode_round_trips_through_wire_value() {
        for op in Opcode::all() {
            let decoded = Opcode::from_u16(op.to_u16()).unwrap();
            assert_eq!(decoded, *op);
        }
    }

    #[test]
    fn unknown_opcode_is_rejected() {
        assert_eq!(Opcode::from_u16(0xFFFF), Err(ProtoError::UnknownOpcode(0xFFFF)));
    }

    #[test]
    fn error_description_table_matches_known_codes() {
        assert_eq!(error_description(0), Some("no error"));
        assert_eq!(error_description(17), Some("pattern image memory address is out of range"));
        assert_eq!(error_description(255), Some("internal error"));
        assert_eq!(error_description(18), None);
    }
}
