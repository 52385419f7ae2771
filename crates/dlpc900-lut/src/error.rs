//! Errors raised while driving the pattern sequencer.

use crate::state::SequencerState;

/// Everything that can go wrong while defining, configuring, or running a
/// pattern LUT.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LutError {
    /// The underlying command/status layer failed.
    #[error(transparent)]
    Driver(#[from] dlpc900_core::DriverError),

    /// A LUT entry could not be encoded onto the wire.
    #[error(transparent)]
    Proto(#[from] dlpc900_proto::ProtoError),

    /// An operation was attempted while the sequencer was in a state that
    /// doesn't allow it.
    #[error("cannot {operation} while the sequencer is {actual:?} (needs {expected:?})")]
    InvalidTransition {
        /// The operation that was attempted.
        operation: &'static str,
        /// State the sequencer was actually in.
        actual: SequencerState,
        /// States the operation is valid from.
        expected: &'static [SequencerState],
    },

    /// More pattern LUT entries were supplied than the controller's table
    /// can hold.
    #[error("{count} LUT entries exceeds the controller's table size of {max}")]
    TooManyEntries {
        /// Number of entries supplied.
        count: usize,
        /// Maximum entries the controller's table holds.
        max: usize,
    },
}
