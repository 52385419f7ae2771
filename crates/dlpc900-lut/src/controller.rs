//! Drives the pattern sequencer: LUT definition, LUT configuration, and
//! start/stop/pause, each gated by [`StateMachine`].

use dlpc900_core::{Clock, DisplayMode, Driver, SystemClock};
use dlpc900_proto::{LutEntry, Opcode};
use dlpc900_transport::HidTransport;
use tracing::info;

use crate::{
    config::{MAX_NUM_LUTS, PatternLutConfig},
    error::LutError,
    state::{SequencerState, StateMachine},
};

/// Maximum number of LUT entries the controller's pattern table holds.
pub const MAX_LUT_ENTRIES: usize = MAX_NUM_LUTS as usize;

const STOP_BYTE: u8 = 0x05;
const PAUSE_BYTE: u8 = 0x00;
const START_BYTE: u8 = 0x08;

/// Owns a [`Driver`] and the sequencer's [`StateMachine`], exposing the
/// define/configure/run lifecycle as state-checked operations.
pub struct LutController<T: HidTransport, C: Clock = SystemClock> {
    driver: Driver<T, C>,
    state: StateMachine,
}

impl<T: HidTransport, C: Clock> LutController<T, C> {
    /// Wrap a [`Driver`], starting in [`SequencerState::Stopped`].
    pub fn new(driver: Driver<T, C>) -> Self {
        Self { driver, state: StateMachine::new() }
    }

    /// Current sequencer state.
    #[must_use]
    pub fn state(&self) -> SequencerState {
        self.state.state()
    }

    /// Borrow the underlying [`Driver`], e.g. to read status while a
    /// sequence is running.
    pub fn driver(&mut self) -> &mut Driver<T, C> {
        &mut self.driver
    }

    /// Switch the controller into on-the-fly pattern sequence mode and move
    /// to [`SequencerState::Ready`].
    ///
    /// # Errors
    ///
    /// Returns a [`dlpc900_core::DriverError`] if the mode switch fails or
    /// doesn't take effect.
    pub fn enter_pattern_mode(&mut self) -> Result<(), LutError> {
        self.enter_mode(DisplayMode::OnTheFlyPatternSequence)
    }

    /// Switch the controller into `mode` and move to
    /// [`SequencerState::Ready`]. Use [`LutController::enter_pattern_mode`]
    /// for the common on-the-fly case; call this directly to run a
    /// pre-stored sequence instead.
    ///
    /// # Errors
    ///
    /// Returns a [`dlpc900_core::DriverError`] if the mode switch fails or
    /// doesn't take effect.
    pub fn enter_mode(&mut self, mode: DisplayMode) -> Result<(), LutError> {
        self.driver.set_display_mode_verified(mode)?;
        self.state.set(SequencerState::Ready);
        Ok(())
    }

    /// Write `entries` to the controller's pattern LUT via `MBOX_DATA`, one
    /// entry per command, and move to [`SequencerState::LutFilled`].
    ///
    /// # Errors
    ///
    /// Returns [`LutError::InvalidTransition`] unless the sequencer is
    /// [`SequencerState::Ready`], [`LutError::TooManyEntries`] if `entries`
    /// exceeds [`MAX_LUT_ENTRIES`], or a proto/driver error if encoding or
    /// sending an entry fails.
    pub fn lut_define(&mut self, entries: &[LutEntry]) -> Result<(), LutError> {
        self.state.require("define LUT", &[SequencerState::Ready])?;
        if entries.len() > MAX_LUT_ENTRIES {
            return Err(LutError::TooManyEntries { count: entries.len(), max: MAX_LUT_ENTRIES });
        }

        for entry in entries {
            let payload = entry.encode()?;
            self.driver.write(Opcode::MailboxData, payload.to_vec())?;
        }

        info!(count = entries.len(), "defined pattern LUT entries");
        self.state.set(SequencerState::LutFilled);
        Ok(())
    }

    /// Load `config` into the controller via `PatternConfig` and move to
    /// [`SequencerState::Armed`].
    ///
    /// # Errors
    ///
    /// Returns [`LutError::InvalidTransition`] unless the sequencer is
    /// [`SequencerState::LutFilled`], or a driver error if the command fails.
    pub fn lut_configure(&mut self, config: PatternLutConfig) -> Result<(), LutError> {
        self.state.require("configure LUT", &[SequencerState::LutFilled])?;
        if config.num_luts > MAX_NUM_LUTS {
            return Err(LutError::TooManyEntries {
                count: config.num_luts as usize,
                max: MAX_NUM_LUTS as usize,
            });
        }
        self.driver.write(Opcode::PatternConfig, config.encode().to_vec())?;
        self.state.set(SequencerState::Armed);
        Ok(())
    }

    /// Start the sequence via `Pattern_Start_Stop` and move to
    /// [`SequencerState::Running`].
    ///
    /// # Errors
    ///
    /// Returns [`LutError::InvalidTransition`] unless the sequencer is
    /// [`SequencerState::Armed`], or a driver error if the command fails.
    pub fn start(&mut self) -> Result<(), LutError> {
        self.state.require("start sequence", &[SequencerState::Armed])?;
        self.driver.write(Opcode::PatternStartStop, vec![START_BYTE])?;
        self.state.set(SequencerState::Running);
        Ok(())
    }

    /// Pause a running sequence, returning it to [`SequencerState::Armed`]
    /// without discarding the loaded LUT.
    ///
    /// # Errors
    ///
    /// Returns [`LutError::InvalidTransition`] unless the sequencer is
    /// [`SequencerState::Running`], or a driver error if the command fails.
    pub fn pause(&mut self) -> Result<(), LutError> {
        self.state.require("pause sequence", &[SequencerState::Running])?;
        self.driver.write(Opcode::PatternStartStop, vec![PAUSE_BYTE])?;
        self.state.set(SequencerState::Armed);
        Ok(())
    }

    /// Stop the sequence from any state and return to
    /// [`SequencerState::Stopped`].
    ///
    /// # Errors
    ///
    /// Returns a driver error if the command fails.
    pub fn stop(&mut self) -> Result<(), LutError> {
        self.driver.write(Opcode::PatternStartStop, vec![STOP_BYTE])?;
        self.state.set(SequencerState::Stopped);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use dlpc900_core::NullClock;
    use dlpc900_transport::FakeHid;

    use super::*;

    fn test_driver(fake: FakeHid) -> Driver<FakeHid, NullClock> {
        Driver::with_clock(fake, dlpc900_core::DEFAULT_TIMEOUT, NullClock)
    }

    fn sample_entry() -> LutEntry {
        LutEntry {
            sequence_position: 0,
            exposure_us: 1_000,
            clear_after_trigger: false,
            bit_depth: 0,
            led_select: dlpc900_proto::LED_SELECT_DISABLED,
            wait_for_trigger: false,
            dark_time_us: 0,
            disable_trig2: false,
            stored_image_index: 0,
            stored_image_bit_index: 0,
        }
    }

    fn ready_controller_with(replies: usize) -> LutController<FakeHid, NullClock> {
        let mut fake = FakeHid::new();
        // write_display_mode ack + read_display_mode read-back.
        fake.queue_response(0x00, 0x00, &[]);
        fake.queue_response(0x00, 0x01, &[DisplayMode::OnTheFlyPatternSequence.to_u8()]);
        for i in 0..replies {
            fake.queue_response(0x00, (2 + i) as u8, &[]);
        }
        let mut controller = LutController::new(test_driver(fake));
        controller.enter_pattern_mode().unwrap();
        controller
    }

    #[test]
    fn lut_define_rejects_before_entering_pattern_mode() {
        let mut controller = LutController::new(test_driver(FakeHid::new()));
        let err = controller.lut_define(&[sample_entry()]).unwrap_err();
        assert_eq!(
            err,
            LutError::InvalidTransition {
                operation: "define LUT",
                actual: SequencerState::Stopped,
                expected: &[SequencerState::Ready],
            }
        );
    }

    #[test]
    fn full_lifecycle_reaches_running() {
        let mut controller = ready_controller_with(3); // 1 lut entry + configure + start
        controller.lut_define(&[sample_entry()]).unwrap();
        assert_eq!(controller.state(), SequencerState::LutFilled);

        controller
            .lut_configure(PatternLutConfig { num_luts: 1, num_repeats: 1 })
            .unwrap();
        assert_eq!(controller.state(), SequencerState::Armed);

        controller.start().unwrap();
        assert_eq!(controller.state(), SequencerState::Running);
    }

    #[test]
    fn too_many_entries_is_rejected_before_any_command_is_sent() {
        let mut controller = ready_controller_with(0);
        let entries = vec![sample_entry(); MAX_LUT_ENTRIES + 1];
        let err = controller.lut_define(&entries).unwrap_err();
        assert_eq!(err, LutError::TooManyEntries { count: MAX_LUT_ENTRIES + 1, max: MAX_LUT_ENTRIES });
    }

    #[test]
    fn stop_is_allowed_from_any_state() {
        let mut fake = FakeHid::new();
        fake.queue_response(0x00, 0x00, &[]);
        let mut controller = LutController::new(test_driver(fake));
        controller.stop().unwrap();
        assert_eq!(controller.state(), SequencerState::Stopped);
    }
}
