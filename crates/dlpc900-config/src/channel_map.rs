//! Channel/mode firmware-index table and its validation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// The mode the firmware falls back to when no explicit mode is requested,
/// and the mode [`validate_channel_map`] requires every channel to define.
pub const DEFAULT_MODE: &str = "default";

/// The mode `noff_before`/`noff_after`/`blank` draw their filler pattern
/// from.
pub const OFF_MODE: &str = "off";

/// `channel_map[channel][mode]` is the ordered list of firmware pattern
/// indices that mode projects for that channel.
pub type ChannelMap = HashMap<String, HashMap<String, Vec<u32>>>;

/// Every channel must define a `default` mode; every mode's indices are
/// stored flat (no nested sequences), which `serde`'s `Vec<u32>` already
/// guarantees at deserialization time. Ported from `validate_channel_map`
/// in the reference driver.
///
/// # Errors
///
/// Returns [`ConfigError::MissingDefaultMode`] for the first channel found
/// without one.
pub fn validate_channel_map(map: &ChannelMap) -> Result<(), ConfigError> {
    for (channel, modes) in map {
        if !modes.contains_key(DEFAULT_MODE) {
            return Err(ConfigError::MissingDefaultMode { channel: channel.clone() });
        }
    }
    Ok(())
}

/// A single firmware-pattern metadata entry, persisted alongside a
/// `channel_map` to describe what each uploaded pattern actually shows.
/// Kept deliberately open-ended (`serde_json::Value`) since the reference
/// driver stores whatever dict the caller supplies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirmwarePatternMeta(pub serde_json::Value);
