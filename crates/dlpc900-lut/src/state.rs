//! The pattern sequencer's state machine.
//!
//! The controller only accepts certain commands in certain states: a LUT
//! can't be configured before it's been defined, and the sequence can't be
//! started before it's been configured. This mirrors `start_stop_sequence`'s
//! implicit state handling in the reference driver, made explicit so a
//! caller gets an error instead of a silently-ignored command.

use crate::error::LutError;

/// Where the pattern sequencer is in its define/configure/run lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerState {
    /// No pattern sequence is loaded; the controller is idle.
    Stopped,
    /// `Disp_Mode` has been switched to a pattern sequence mode, but no LUT
    /// entries have been defined yet.
    Ready,
    /// All LUT entries have been written via `MBOX_DATA`.
    LutFilled,
    /// The LUT has been loaded into the controller via `PatternConfig` and
    /// is ready to run.
    Armed,
    /// The sequence is actively displaying.
    Running,
}

/// Tracks [`SequencerState`] and rejects operations the current state
/// doesn't allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateMachine {
    state: SequencerState,
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl StateMachine {
    /// Start in [`SequencerState::Stopped`].
    #[must_use]
    pub const fn new() -> Self {
        Self { state: SequencerState::Stopped }
    }

    /// The current state.
    #[must_use]
    pub const fn state(&self) -> SequencerState {
        self.state
    }

    /// Require the current state to be one of `allowed`, naming `operation`
    /// in the resulting error if not.
    ///
    /// # Errors
    ///
    /// Returns [`LutError::InvalidTransition`] if the current state isn't in
    /// `allowed`.
    pub fn require(
        &self,
        operation: &'static str,
        allowed: &'static [SequencerState],
    ) -> Result<(), LutError> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(LutError::InvalidTransition { operation, actual: self.state, expected: allowed })
        }
    }

    /// Move to `state` unconditionally. Callers call [`StateMachine::require`]
    /// first to validate the edge.
    pub fn set(&mut self, state: SequencerState) {
        self.state = state;
    }
}
