//! The persisted configuration document: everything the CLI needs to
//! resolve a channel/mode preset into a concrete firmware-pattern sequence
//! without talking to a live controller first.

use std::{
    path::Path,
    time::{SystemTime, UNIX_EPOCH},
};

use serde::{Deserialize, Serialize};

use crate::{
    channel_map::{ChannelMap, FirmwarePatternMeta, OFF_MODE, validate_channel_map},
    error::ConfigError,
};

/// A saved driver configuration: a timestamp, optional firmware-pattern
/// metadata, an optional channel map, and an optional HID device path.
/// Persisted as JSON, mirroring `save_config_file`/`load_config_file` in
/// the reference driver (which also supports a zarr directory form; see
/// `DESIGN.md` for why this workspace supports JSON only).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unix timestamp, in seconds, this document was written at.
    pub timestamp: u64,
    /// Metadata describing each firmware-resident pattern, in firmware
    /// index order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firmware_patterns: Option<Vec<FirmwarePatternMeta>>,
    /// `channel_map[channel][mode]` firmware-index presets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_map: Option<ChannelMap>,
    /// HID device path to open instead of scanning by vendor/product id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hid_device_path: Option<String>,
}

impl Document {
    /// An empty document stamped with the current time.
    ///
    /// Falls back to a zero timestamp if the system clock reports a time
    /// before the Unix epoch.
    #[must_use]
    pub fn new() -> Self {
        let timestamp = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0);
        Self { timestamp, firmware_patterns: None, channel_map: None, hid_device_path: None }
    }

    /// Read and parse a document from `path`, validating its channel map
    /// (if present) before returning it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file can't be read,
    /// [`ConfigError::Json`] if it doesn't parse, or
    /// [`ConfigError::MissingDefaultMode`] if its channel map omits a
    /// `default` mode for some channel.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let doc: Self = serde_json::from_str(&text)?;
        if let Some(map) = &doc.channel_map {
            validate_channel_map(map)?;
        }
        Ok(doc)
    }

    /// Serialize this document as pretty JSON and write it to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] if serialization fails, or
    /// [`ConfigError::Io`] if the write fails.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }

    /// Resolve `channel`'s `mode` preset to its stored firmware-pattern
    /// index list, mirroring `presets[channel][mode]` lookups in
    /// `get_dmd_sequence`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownChannel`] if the channel map is absent
    /// or doesn't contain `channel`, or [`ConfigError::UnknownMode`] if
    /// `channel` doesn't define `mode`.
    pub fn resolve(&self, channel: &str, mode: &str) -> Result<Vec<u32>, ConfigError> {
        let map =
            self.channel_map.as_ref().ok_or_else(|| ConfigError::UnknownChannel { channel: channel.to_string() })?;
        let modes = map.get(channel).ok_or_else(|| ConfigError::UnknownChannel { channel: channel.to_string() })?;
        let indices =
            modes.get(mode).ok_or_else(|| ConfigError::UnknownMode { channel: channel.to_string(), mode: mode.to_string() })?;
        Ok(indices.clone())
    }

    /// The single firmware index `channel`'s `off` mode resolves to, used
    /// to pad a sequence with blank frames.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingOffMode`] if the channel has no `off`
    /// mode, or if that mode is empty.
    pub fn off_pattern(&self, channel: &str) -> Result<u32, ConfigError> {
        let indices = self
            .resolve(channel, OFF_MODE)
            .map_err(|_| ConfigError::MissingOffMode { channel: channel.to_string() })?;
        indices.first().copied().ok_or_else(|| ConfigError::MissingOffMode { channel: channel.to_string() })
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
