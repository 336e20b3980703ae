//! Zero-crossing rate and brightness proxy
//!
//! A sign-change count stands in for spectral content: a sine at `f` Hz
//! crosses zero `2f` times per second, so `zcr * sample_rate / 2` is a rough
//! centroid estimate. Frames far below the onset peak are gated out so that a
//! short hit followed by a quiet tail is not diluted towards zero.

use super::ms_to_samples;
use crate::config::TextureConfig;
use crate::preprocessing::normalization::peak_amplitude;

/// Zero-crossing rate of the active part of the leading texture window
///
/// # Arguments
///
/// * `samples` - Trimmed mono samples
/// * `peak` - Onset peak amplitude, reference for the activity gate
/// * `sample_rate` - Sample rate in Hz
/// * `config` - Window, frame and gate parameters
///
/// # Returns
///
/// Crossings per active sample in `[0.0, 1.0]`; 0.0 when nothing is active.
///
/// # Example
///
/// ```
/// use sample_dna::config::TextureConfig;
/// use sample_dna::features::texture::zero_crossing_rate;
///
/// // Alternating signs: a crossing between every pair of samples
/// let samples: Vec<f32> = (0..4410).map(|i| if i % 2 == 0 { 0.5 } else { -0.5 }).collect();
/// let zcr = zero_crossing_rate(&samples, 0.5, 44100, &TextureConfig::default());
/// assert!(zcr > 0.99);
/// ```
pub fn zero_crossing_rate(samples: &[f32], peak: f32, sample_rate: u32, config: &TextureConfig) -> f32 {
    if samples.len() < 2 || sample_rate == 0 {
        return 0.0;
    }

    let window_len = ms_to_samples(config.zcr_window_ms, sample_rate).min(samples.len());
    let frame_len = ms_to_samples(config.zcr_frame_ms, sample_rate).max(2);
    let gate = peak * config.zcr_gate_fraction;

    let mut crossings = 0usize;
    let mut active = 0usize;
    let mut previous: Option<f32> = None;

    for frame in samples[..window_len].chunks(frame_len) {
        if peak_amplitude(frame) < gate {
            previous = None;
            continue;
        }

        if let (Some(last), Some(&first)) = (previous, frame.first()) {
            if crosses_zero(last, first) {
                crossings += 1;
            }
        }
        crossings += frame.windows(2).filter(|w| crosses_zero(w[0], w[1])).count();
        active += frame.len();
        previous = frame.last().copied();
    }

    if active < 2 {
        return 0.0;
    }

    let rate = (crossings as f32 / active as f32).clamp(0.0, 1.0);
    log::debug!(
        "Zero-crossing rate {:.4} ({} crossings over {} active samples)",
        rate,
        crossings,
        active
    );
    rate
}

/// Centroid estimate in Hz and brightness in `[0.0, 1.0]` from a zero-crossing rate
pub fn brightness(zcr: f32, sample_rate: u32, config: &TextureConfig) -> (f32, f32) {
    let centroid_hz = zcr.max(0.0) * sample_rate as f32 / 2.0;
    let brightness = (centroid_hz / config.brightness_reference_hz).clamp(0.0, 1.0);
    (centroid_hz, brightness)
}

/// Sign change from `a` to `b`; a run that touches zero counts once
fn crosses_zero(a: f32, b: f32) -> bool {
    (b > 0.0 && a <= 0.0) || (b < 0.0 && a >= 0.0)
}
