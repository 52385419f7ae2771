//! Upload orchestration: bitmap streaming and LUT sequencing for
//! on-the-fly and pre-stored pattern sequences.

pub mod error;
pub mod index;
pub mod orchestrator;
pub mod request;

pub use error::UploadError;
pub use index::{index_to_pic_bit, pic_bit_to_index};
pub use orchestrator::UploadOrchestrator;
pub use request::{
    MIN_EXPOSURE_US, PatternUploadRequest, PerPattern, PreStoredSequenceRequest, SUPPORTED_BIT_DEPTH,
};
