//! The `Driver` aggregate: a sequence counter and a transport, wired up to
//! `execute` one command at a time with automatic controller-error
//! translation.

use std::time::Duration;

use dlpc900_proto::{Bytes, CommandPacket, Opcode, ResponsePacket};
use dlpc900_transport::{HidTransport, framer};
use tracing::{debug, warn};

use crate::{
    clock::{Clock, SystemClock},
    error::DriverError,
    status::{
        DisplayMode, FirmwareVersion, StatusFlags, TriggerConfig, decode_hardware_status,
        decode_main_status, decode_system_status,
    },
};

/// Default time to wait for one response after writing a command.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(500);

/// Time to let the controller populate its reply buffer after a write,
/// before issuing the read that fetches the response.
pub const WRITE_SETTLE: Duration = Duration::from_millis(100);

/// Time to let a display-mode change take effect before reading it back.
pub const MODE_CHANGE_SETTLE: Duration = Duration::from_millis(500);

/// Delay before the single automatic retry on a `send_frame` failure.
pub const RETRY_DELAY: Duration = Duration::from_millis(100);

/// Drives a DLPC900 controller over any [`HidTransport`].
///
/// Owns the 8-bit sequence counter the protocol expects the host to
/// increment on every command, and centralizes controller-error checking so
/// callers never have to inspect a raw [`ResponsePacket`]'s flag byte
/// themselves. Generic over a [`Clock`] so the settle/retry sleeps around
/// each exchange can be skipped in tests driving a fake transport.
pub struct Driver<T: HidTransport, C: Clock = SystemClock> {
    transport: T,
    sequence: u8,
    timeout: Duration,
    clock: C,
}

impl<T: HidTransport> Driver<T, SystemClock> {
    /// Wrap `transport`, using [`DEFAULT_TIMEOUT`] for every response and a
    /// real [`SystemClock`] for settle/retry sleeps.
    pub fn new(transport: T) -> Self {
        Self { transport, sequence: 0, timeout: DEFAULT_TIMEOUT, clock: SystemClock }
    }

    /// Wrap `transport` with an explicit response timeout.
    pub fn with_timeout(transport: T, timeout: Duration) -> Self {
        Self { transport, sequence: 0, timeout, clock: SystemClock }
    }
}

impl<T: HidTransport, C: Clock> Driver<T, C> {
    /// Wrap `transport` with an explicit response timeout and [`Clock`],
    /// e.g. a [`crate::clock::NullClock`] to skip settle/retry sleeps in
    /// tests.
    pub fn with_clock(transport: T, timeout: Duration, clock: C) -> Self {
        Self { transport, sequence: 0, timeout, clock }
    }

    /// Borrow the underlying transport, e.g. to inspect a [`dlpc900_transport::FakeHid`]'s
    /// command log in tests.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn next_sequence(&mut self) -> u8 {
        let seq = self.sequence;
        self.sequence = self.sequence.wrapping_add(1);
        seq
    }

    /// Write `payload` to `opcode` and return the controller's response.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Controller`] if the controller's response sets
    /// the error flag, or a transport/protocol error if the exchange itself
    /// fails.
    pub fn write(
        &mut self,
        opcode: Opcode,
        payload: impl Into<Bytes>,
    ) -> Result<ResponsePacket, DriverError> {
        let seq = self.next_sequence();
        self.execute(CommandPacket::write(seq, opcode, payload))
    }

    /// Issue a read command for `opcode` and return the controller's response.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Controller`] if the controller's response sets
    /// the error flag, or a transport/protocol error if the exchange itself
    /// fails.
    pub fn read(&mut self, opcode: Opcode) -> Result<ResponsePacket, DriverError> {
        let seq = self.next_sequence();
        self.execute(CommandPacket::read(seq, opcode))
    }

    /// Send a pre-built command and return the controller's response,
    /// translating an error-flagged response into a fetched
    /// [`DriverError::Controller`].
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Controller`] if the response carries the error
    /// flag, or a transport/protocol error if the exchange itself fails.
    pub fn execute(&mut self, cmd: CommandPacket) -> Result<ResponsePacket, DriverError> {
        debug!(opcode = ?cmd.opcode, sequence = cmd.sequence, "executing command");
        if let Err(err) = framer::write_command(&mut self.transport, &cmd) {
            warn!(?err, "send_frame failed, retrying once after settle delay");
            self.clock.sleep(RETRY_DELAY);
            framer::write_command(&mut self.transport, &cmd)?;
        }
        self.clock.sleep(WRITE_SETTLE);
        let response = framer::read_response(&mut self.transport, self.timeout)?;
        if response.flag.error {
            return Err(self.fetch_controller_error()?);
        }
        Ok(response)
    }

    fn fetch_controller_error(&mut self) -> Result<DriverError, DriverError> {
        let code_resp = self.read(Opcode::ReadErrorCode)?;
        let code = *code_resp.payload.first().unwrap_or(&0xFF);

        let description = match self.read(Opcode::ReadErrorDescription) {
            Ok(resp) => String::from_utf8_lossy(&resp.payload).trim_end_matches('\0').to_string(),
            Err(_) => dlpc900_proto::error_description(code).unwrap_or("unknown error").to_string(),
        };

        Ok(DriverError::Controller { code, description })
    }

    /// `Read_Error_Code`: the last error code recorded by the controller.
    ///
    /// # Errors
    ///
    /// Returns a transport/protocol error if the exchange itself fails.
    pub fn read_error_code(&mut self) -> Result<u8, DriverError> {
        let resp = self.read(Opcode::ReadErrorCode)?;
        Ok(*resp.payload.first().unwrap_or(&0))
    }

    /// `Read_Error_Description`: the human-readable description of the last
    /// error.
    ///
    /// # Errors
    ///
    /// Returns a transport/protocol error if the exchange itself fails.
    pub fn read_error_description(&mut self) -> Result<String, DriverError> {
        let resp = self.read(Opcode::ReadErrorDescription)?;
        Ok(String::from_utf8_lossy(&resp.payload).trim_end_matches('\0').to_string())
    }

    /// `Get_Main_Status`.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::UnexpectedPayloadLength`] if the controller's
    /// response is empty, or a transport/protocol error if the exchange
    /// itself fails.
    pub fn get_main_status(&mut self) -> Result<StatusFlags, DriverError> {
        let resp = self.read(Opcode::GetMainStatus)?;
        let byte = *resp
            .payload
            .first()
            .ok_or(DriverError::UnexpectedPayloadLength { expected: 1, got: 0 })?;
        Ok(decode_main_status(byte))
    }

    /// `Get_Hardware_Status`.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::UnexpectedPayloadLength`] if the controller's
    /// response is empty, or a transport/protocol error if the exchange
    /// itself fails.
    pub fn get_hardware_status(&mut self) -> Result<StatusFlags, DriverError> {
        let resp = self.read(Opcode::GetHardwareStatus)?;
        let byte = *resp
            .payload
            .first()
            .ok_or(DriverError::UnexpectedPayloadLength { expected: 1, got: 0 })?;
        Ok(decode_hardware_status(byte))
    }

    /// `Get_System_Status`.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::UnexpectedPayloadLength`] if the controller's
    /// response is empty, or a transport/protocol error if the exchange
    /// itself fails.
    pub fn get_system_status(&mut self) -> Result<StatusFlags, DriverError> {
        let resp = self.read(Opcode::GetSystemStatus)?;
        let byte = *resp
            .payload
            .first()
            .ok_or(DriverError::UnexpectedPayloadLength { expected: 1, got: 0 })?;
        Ok(decode_system_status(byte))
    }

    /// `Get_Firmware_Version`.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::UnexpectedPayloadLength`] if the controller's
    /// response is shorter than 16 bytes, or a transport/protocol error if
    /// the exchange itself fails.
    pub fn get_firmware_version(&mut self) -> Result<FirmwareVersion, DriverError> {
        let resp = self.read(Opcode::GetFirmwareVersion)?;
        FirmwareVersion::parse(&resp.payload)
    }

    /// `Get_Firmware_Type`: the firmware's tag string (e.g. the DMD part
    /// number it was built for).
    ///
    /// # Errors
    ///
    /// Returns a transport/protocol error if the exchange itself fails.
    pub fn get_firmware_type(&mut self) -> Result<String, DriverError> {
        let resp = self.read(Opcode::GetFirmwareType)?;
        Ok(String::from_utf8_lossy(&resp.payload).trim_end_matches('\0').to_string())
    }

    /// `Disp_Mode` write.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Controller`] if the controller rejects the
    /// mode, or a transport/protocol error if the exchange itself fails.
    pub fn write_display_mode(&mut self, mode: DisplayMode) -> Result<(), DriverError> {
        self.write(Opcode::DisplayMode, vec![mode.to_u8()])?;
        Ok(())
    }

    /// `Disp_Mode` read.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::UnexpectedPayloadLength`] if the controller's
    /// response is empty, or a transport/protocol error if the exchange
    /// itself fails.
    pub fn read_display_mode(&mut self) -> Result<DisplayMode, DriverError> {
        let resp = self.read(Opcode::DisplayMode)?;
        let byte = *resp
            .payload
            .first()
            .ok_or(DriverError::UnexpectedPayloadLength { expected: 1, got: 0 })?;
        DisplayMode::from_u8(byte)
    }

    /// Write `mode` and read it back, failing loudly instead of silently
    /// proceeding with a mode the controller never actually activated.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::ModeActivationError`] if the read-back mode
    /// does not match `mode`.
    pub fn set_display_mode_verified(&mut self, mode: DisplayMode) -> Result<(), DriverError> {
        self.write_display_mode(mode)?;
        self.clock.sleep(MODE_CHANGE_SETTLE);
        let actual = self.read_display_mode()?;
        if actual != mode {
            return Err(DriverError::ModeActivationError { expected: mode, actual });
        }
        Ok(())
    }

    /// `Trig_Out1_Ctl`.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::TriggerDelayOutOfRange`] if `config.delay_us`
    /// exceeds [`TriggerConfig::MAX_DELAY_US`], or a transport/protocol
    /// error if the exchange itself fails.
    pub fn set_trigger_out1(&mut self, config: TriggerConfig) -> Result<(), DriverError> {
        self.set_trigger(Opcode::TrigOut1Control, config)
    }

    /// `Trig_Out2_Ctl`.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::TriggerDelayOutOfRange`] if `config.delay_us`
    /// exceeds [`TriggerConfig::MAX_DELAY_US`], or a transport/protocol
    /// error if the exchange itself fails.
    pub fn set_trigger_out2(&mut self, config: TriggerConfig) -> Result<(), DriverError> {
        self.set_trigger(Opcode::TrigOut2Control, config)
    }

    /// `Trig_In1_Ctl`.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::TriggerDelayOutOfRange`] if `config.delay_us`
    /// exceeds [`TriggerConfig::MAX_DELAY_US`], or a transport/protocol
    /// error if the exchange itself fails.
    pub fn set_trigger_in1(&mut self, config: TriggerConfig) -> Result<(), DriverError> {
        self.set_trigger(Opcode::TrigIn1Control, config)
    }

    /// `Trig_In2_Ctl`.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::TriggerDelayOutOfRange`] if `config.delay_us`
    /// exceeds [`TriggerConfig::MAX_DELAY_US`], or a transport/protocol
    /// error if the exchange itself fails.
    pub fn set_trigger_in2(&mut self, config: TriggerConfig) -> Result<(), DriverError> {
        self.set_trigger(Opcode::TrigIn2Control, config)
    }

    fn set_trigger(&mut self, opcode: Opcode, config: TriggerConfig) -> Result<(), DriverError> {
        config.validate()?;
        self.write(opcode, config.encode().to_vec())?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use dlpc900_transport::FakeHid;

    use super::*;
    use crate::clock::NullClock;

    fn test_driver(fake: FakeHid) -> Driver<FakeHid, NullClock> {
        Driver::with_clock(fake, DEFAULT_TIMEOUT, NullClock)
    }

    fn driver_with_reply(flag: u8, payload: &[u8]) -> Driver<FakeHid, NullClock> {
        let mut fake = FakeHid::new();
        fake.queue_response(flag, 0x00, payload);
        test_driver(fake)
    }

    #[test]
    fn read_main_status_decodes_payload_byte() {
        let mut driver = driver_with_reply(0x00, &[0b0000_0010]);
        let status = driver.get_main_status().unwrap();
        assert_eq!(status.set, vec!["sequencer is running normally"]);
    }

    #[test]
    fn error_flagged_response_fetches_code_and_description() {
        let mut fake = FakeHid::new();
        // First reply: the command itself, flagged as an error.
        fake.queue_response(0x20, 0x00, &[]);
        // Second reply: Read_Error_Code.
        fake.queue_response(0x00, 0x01, &[6]);
        // Third reply: Read_Error_Description.
        fake.queue_response(0x00, 0x02, b"invalid command parameter\0");
        let mut driver = test_driver(fake);

        let err = driver.write_display_mode(DisplayMode::Video).unwrap_err();
        assert_eq!(
            err,
            DriverError::Controller { code: 6, description: "invalid command parameter".to_string() }
        );
    }

    #[test]
    fn set_display_mode_verified_detects_mismatch() {
        let mut fake = FakeHid::new();
        // Write acknowledgement.
        fake.queue_response(0x00, 0x00, &[]);
        // Read-back reports a different mode than what was written.
        fake.queue_response(0x00, 0x01, &[DisplayMode::Video.to_u8()]);
        let mut driver = test_driver(fake);

        let err = driver.set_display_mode_verified(DisplayMode::OnTheFlyPatternSequence).unwrap_err();
        assert_eq!(
            err,
            DriverError::ModeActivationError {
                expected: DisplayMode::OnTheFlyPatternSequence,
                actual: DisplayMode::Video,
            }
        );
    }

    #[test]
    fn trigger_out_of_range_never_reaches_the_transport() {
        let mut driver = test_driver(FakeHid::new());
        let config = TriggerConfig { active_high: true, delay_us: 30_000, pulse_width_us: 0 };
        let err = driver.set_trigger_out1(config).unwrap_err();
        assert_eq!(err, DriverError::TriggerDelayOutOfRange { value: 30_000, max: 20_000 });
        assert!(driver.transport().command_log().is_empty());
    }

    #[test]
    fn write_is_retried_once_after_a_transport_failure() {
        let mut fake = FakeHid::new();
        fake.fail_next_writes(1);
        fake.queue_response(0x00, 0x00, &[]);
        let mut driver = test_driver(fake);

        driver.write_display_mode(DisplayMode::Video).unwrap();
        assert_eq!(driver.transport().command_log().len(), 1);
    }

    #[test]
    fn sequence_number_increments_per_command() {
        let mut fake = FakeHid::new();
        fake.queue_response(0x00, 0x00, &[0]);
        fake.queue_response(0x00, 0x01, &[0]);
        let mut driver = test_driver(fake);
        driver.get_main_status().unwrap();
        driver.get_main_status().unwrap();
        let log = driver.transport().command_log();
        assert_eq!(log[0].sequence, 0);
        assert_eq!(log[1].sequence, 1);
    }
}
