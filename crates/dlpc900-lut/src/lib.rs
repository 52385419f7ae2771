//! Pattern LUT definition, configuration, and the sequencer state machine
//! for the DLPC900.

pub mod config;
pub mod controller;
pub mod error;
pub mod state;

pub use config::PatternLutConfig;
pub use controller::{LutController, MAX_LUT_ENTRIES};
pub use error::LutError;
pub use state::SequencerState;
