//! Turns parsed [`Args`](crate::args::Args) plus a loaded
//! [`Document`](dlpc900_config::Document) into a
//! [`PreStoredSequenceRequest`], with no I/O, so the resolution logic can
//! be unit-tested without a controller attached.

use dlpc900_config::{Document, PresetRequest, build_sequence};
use dlpc900_upload::{PerPattern, PreStoredSequenceRequest, index_to_pic_bit};

use crate::{args::Args, error::CliError};

/// Broadcast `args.modes` across `args.channels` (a single mode applies to
/// every channel; otherwise one mode per channel is required), resolve
/// each channel's preset against `doc`, and build the
/// [`PreStoredSequenceRequest`] the orchestrator runs.
///
/// # Errors
///
/// Returns [`CliError::Config`] if `args.modes` doesn't broadcast cleanly
/// against `args.channels` or a channel/mode preset fails to resolve, or
/// [`CliError::EmptySequence`] if the resolved sequence has no patterns.
pub fn build_request(args: &Args, doc: &Document) -> Result<PreStoredSequenceRequest, CliError> {
    let modes = broadcast_modes(&args.modes, args.channels.len())?;

    let requests: Vec<PresetRequest> = args
        .channels
        .iter()
        .zip(modes)
        .map(|(channel, mode)| PresetRequest {
            channel: channel.clone(),
            mode,
            pattern_indices: args.pattern_indices.clone(),
            nrepeats: args.nrepeats,
            noff_before: args.noff_before,
            noff_after: args.noff_after,
            blank: args.blank,
        })
        .collect();

    let firmware_indices = build_sequence(doc, &requests)?;
    if firmware_indices.is_empty() {
        return Err(CliError::EmptySequence);
    }

    let stored_indices =
        firmware_indices.iter().map(|&index| index_to_pic_bit(index as usize)).collect();

    Ok(PreStoredSequenceRequest {
        stored_indices,
        exposures_us: PerPattern::Broadcast(args.illumination_time),
        dark_us: PerPattern::Broadcast(0),
        num_repeats: args.num_repeats,
        triggered: args.triggered,
    })
}

fn broadcast_modes(modes: &[String], nchannels: usize) -> Result<Vec<String>, CliError> {
    match modes.len() {
        1 => Ok(vec![modes[0].clone(); nchannels]),
        n if n == nchannels => Ok(modes.to_vec()),
        got => Err(CliError::Config(dlpc900_config::ConfigError::LengthMismatch {
            field: "modes",
            got,
            expected: nchannels,
        })),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use dlpc900_config::{ChannelMap, OFF_MODE};

    use super::*;

    fn doc() -> Document {
        let mut red_modes = HashMap::new();
        red_modes.insert("default".to_string(), vec![0, 1, 2]);
        red_modes.insert(OFF_MODE.to_string(), vec![9]);
        let mut map = ChannelMap::new();
        map.insert("red".to_string(), red_modes);
        Document { timestamp: 0, firmware_patterns: None, channel_map: Some(map), hid_device_path: None }
    }

    fn args(channels: &[&str], modes: &[&str]) -> Args {
        Args {
            channels: channels.iter().map(|s| (*s).to_string()).collect(),
            modes: modes.iter().map(|s| (*s).to_string()).collect(),
            pattern_indices: None,
            nrepeats: 1,
            noff_before: 0,
            noff_after: 0,
            blank: false,
            triggered: false,
            illumination_time: 1_000,
            num_repeats: 0,
            config: std::path::PathBuf::from("unused.json"),
            log_level: "info".to_string(),
            verbose: false,
        }
    }

    #[test]
    fn single_mode_broadcasts_to_all_channels() {
        let request = build_request(&args(&["red"], &["default"]), &doc()).unwrap();
        assert_eq!(request.stored_indices, vec![(0, 0), (0, 1), (0, 2)]);
    }

    #[test]
    fn mismatched_mode_count_is_rejected() {
        let err = build_request(&args(&["red", "red"], &["default", "off", "off"]), &doc()).unwrap_err();
        assert!(matches!(err, CliError::Config(dlpc900_config::ConfigError::LengthMismatch { .. })));
    }

    #[test]
    fn empty_resolved_sequence_is_rejected() {
        let mut doc = doc();
        doc.channel_map.as_mut().unwrap().get_mut("red").unwrap().insert("empty".to_string(), vec![]);
        let err = build_request(&args(&["red"], &["empty"]), &doc).unwrap_err();
        assert!(matches!(err, CliError::EmptySequence));
    }

    #[test]
    fn firmware_indices_convert_to_picture_and_bit_pairs() {
        let mut modes = HashMap::new();
        modes.insert("default".to_string(), vec![23, 24, 49]);
        let mut map = ChannelMap::new();
        map.insert("red".to_string(), modes);
        let doc = Document { timestamp: 0, firmware_patterns: None, channel_map: Some(map), hid_device_path: None };

        let request = build_request(&args(&["red"], &["default"]), &doc).unwrap();
        assert_eq!(request.stored_indices, vec![(0, 23), (1, 0), (2, 1)]);
    }
}
