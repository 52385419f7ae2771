//! Persisted JSON configuration and channel/mode preset resolution for the
//! DLPC900 driver.
//!
//! This crate is an external collaborator, not part of the protocol core:
//! it never touches a transport or a controller. It turns a
//! human-maintained preset table (which firmware pattern indices make up
//! "red, default" or "blue, off") plus CLI-style modifiers into the flat
//! firmware-index sequence `dlpc900-upload`'s
//! [`dlpc900_upload::PreStoredSequenceRequest`] expects.

pub mod channel_map;
pub mod document;
pub mod error;
pub mod preset;

pub use channel_map::{ChannelMap, DEFAULT_MODE, FirmwarePatternMeta, OFF_MODE, validate_channel_map};
pub use document::Document;
pub use error::ConfigError;
pub use preset::{PresetRequest, build_sequence};
