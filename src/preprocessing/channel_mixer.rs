//! Channel extraction (interleaved multi-channel to a single channel)
//!
//! Feature extraction is single-channel. Decoders hand back interleaved
//! frames; the engine analyzes one channel of them (channel 0 by default)
//! rather than a downmix, so a hard-panned layer is not attenuated.

use crate::error::AnalysisError;

/// Extract one channel from interleaved samples
///
/// # Arguments
///
/// * `interleaved` - Samples laid out frame by frame (`L R L R ...`)
/// * `channels` - Number of channels per frame
/// * `channel` - Zero-based channel to keep
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if `channels` is 0 or `channel` is
/// out of range. A trailing partial frame is dropped.
pub fn extract_channel(
    interleaved: &[f32],
    channels: usize,
    channel: usize,
) -> Result<Vec<f32>, AnalysisError> {
    if channels == 0 {
        return Err(AnalysisError::InvalidInput(
            "Channel count must be > 0".to_string(),
        ));
    }

    if channel >= channels {
        return Err(AnalysisError::InvalidInput(format!(
            "Channel {} out of range for {} channel audio",
            channel, channels
        )));
    }

    if channels == 1 {
        return Ok(interleaved.to_vec());
    }

    log::debug!(
        "Extracting channel {} from {} interleaved samples ({} channels)",
        channel,
        interleaved.len(),
        channels
    );

    Ok(interleaved
        .chunks_exact(channels)
        .map(|frame| frame[channel])
        .collect())
}
