//! Resolves a channel/mode preset plus CLI-style modifiers into a concrete
//! firmware-pattern index sequence, mirroring `get_dmd_sequence` in the
//! reference driver.

use crate::{document::Document, error::ConfigError};

/// One channel/mode preset request, with the same modifiers
/// `get_dmd_sequence` accepts per channel: a pattern-index subset, a
/// repeat count, leading/trailing "off" padding, and inter-pattern
/// blanking.
#[derive(Debug, Clone)]
pub struct PresetRequest {
    /// Channel name, a key into the document's channel map.
    pub channel: String,
    /// Mode name, a key into `channel_map[channel]`.
    pub mode: String,
    /// Select only these indices out of the resolved mode's pattern list,
    /// or `None` to use all of them in order.
    pub pattern_indices: Option<Vec<usize>>,
    /// Number of times to repeat the (possibly subset) pattern list.
    pub nrepeats: u32,
    /// Number of "off" frames to prepend.
    pub noff_before: u32,
    /// Number of "off" frames to append.
    pub noff_after: u32,
    /// Insert an "off" frame after every pattern, to blank an attached
    /// light source between exposures.
    pub blank: bool,
}

impl PresetRequest {
    /// Resolve this single preset against `doc`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownChannel`]/[`ConfigError::UnknownMode`]
    /// if the channel/mode pair isn't in the document's channel map,
    /// [`ConfigError::IndexOutOfBounds`] if `pattern_indices` references a
    /// position past the resolved mode's pattern count, or
    /// [`ConfigError::MissingOffMode`] if off-padding or blanking was
    /// requested but the channel has no `off` mode.
    pub fn resolve(&self, doc: &Document) -> Result<Vec<u32>, ConfigError> {
        let base = doc.resolve(&self.channel, &self.mode)?;

        let selected: Vec<u32> = match &self.pattern_indices {
            None => base,
            Some(indices) => indices
                .iter()
                .map(|&index| {
                    base.get(index).copied().ok_or(ConfigError::IndexOutOfBounds {
                        channel: self.channel.clone(),
                        mode: self.mode.clone(),
                        index,
                        len: base.len(),
                    })
                })
                .collect::<Result<_, _>>()?,
        };

        let repeated: Vec<u32> =
            std::iter::repeat_n(selected, self.nrepeats.max(1) as usize).flatten().collect();

        let padded = if self.noff_before != 0 || self.noff_after != 0 {
            let off = doc.off_pattern(&self.channel)?;
            let mut out = vec![off; self.noff_before as usize];
            out.extend(repeated);
            out.extend(std::iter::repeat_n(off, self.noff_after as usize));
            out
        } else {
            repeated
        };

        if self.blank {
            let off = doc.off_pattern(&self.channel)?;
            let mut out = Vec::with_capacity(padded.len() * 2);
            for pattern in padded {
                out.push(pattern);
                out.push(off);
            }
            Ok(out)
        } else {
            Ok(padded)
        }
    }
}

/// Resolve every request in `requests` and concatenate the results in
/// order, mirroring `np.hstack(f_inds)` at the end of `get_dmd_sequence`.
///
/// # Errors
///
/// Returns the first error any individual [`PresetRequest::resolve`] call
/// produces.
pub fn build_sequence(doc: &Document, requests: &[PresetRequest]) -> Result<Vec<u32>, ConfigError> {
    let mut out = Vec::new();
    for request in requests {
        out.extend(request.resolve(doc)?);
    }
    Ok(out)
}
