//! Attack/decay envelope measurement
//!
//! The attack peak is searched only inside a bounded onset window so that a
//! later transient (a flam, the second hit of a loop) is never mistaken for
//! the attack. The decay is scanned on a peak-hold envelope of short frames
//! rather than raw samples, since every oscillating waveform passes through
//! zero long before it has decayed.

use serde::{Deserialize, Serialize};

use super::ms_to_samples;
use crate::config::EnvelopeConfig;
use crate::preprocessing::normalization::peak_amplitude;

/// Measured amplitude envelope of a trimmed one-shot
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Largest absolute sample inside the onset window
    pub peak_amplitude: f32,

    /// Index of that sample, relative to the onset
    pub peak_index: usize,

    /// Onset to peak, floored at `attack_floor_ms`
    pub attack_ms: f32,

    /// Peak to the decay threshold, floored at `decay_floor_ms`
    pub decay_ms: f32,

    /// First index of the frame where the envelope fell below the threshold
    /// (or the end of the scan)
    pub decay_end_index: usize,
}

/// Measure attack and decay of `samples`
///
/// `samples` should be trimmed so that index 0 is the onset.
///
/// # Arguments
///
/// * `samples` - Trimmed mono samples
/// * `sample_rate` - Sample rate in Hz
/// * `config` - Onset window, decay threshold and frame parameters
///
/// # Returns
///
/// A zeroed [`Envelope`] for empty input or `sample_rate == 0`, otherwise an
/// envelope whose `attack_ms` and `decay_ms` are at least the configured floors.
///
/// # Example
///
/// ```
/// use sample_dna::config::EnvelopeConfig;
/// use sample_dna::features::envelope::measure_envelope;
///
/// // 1 kHz sample rate: one sample per millisecond
/// let mut samples = vec![0.0f32; 1000];
/// samples[5] = 1.0;
/// for s in &mut samples[6..55] {
///     *s = 0.5;
/// }
///
/// let env = measure_envelope(&samples, 1000, &EnvelopeConfig::default());
/// assert_eq!(env.peak_index, 5);
/// assert!((env.attack_ms - 5.0).abs() < 1e-4);
/// assert!((env.decay_ms - 50.0).abs() < 1e-4);
/// ```
pub fn measure_envelope(samples: &[f32], sample_rate: u32, config: &EnvelopeConfig) -> Envelope {
    if samples.is_empty() || sample_rate == 0 {
        return Envelope::default();
    }

    let sr = sample_rate as f32;
    let onset_len = ms_to_samples(config.onset_window_ms, sample_rate).clamp(1, samples.len());

    let (peak_index, peak) = samples[..onset_len]
        .iter()
        .enumerate()
        .fold((0usize, 0.0f32), |(best_i, best), (i, &s)| {
            if s.abs() > best {
                (i, s.abs())
            } else {
                (best_i, best)
            }
        });

    let threshold = peak * config.decay_fraction;
    let frame_len = ms_to_samples(config.envelope_frame_ms, sample_rate).max(1);
    let scan_end = (peak_index + ms_to_samples(config.decay_cap_ms, sample_rate)).min(samples.len());

    let mut decay_end_index = scan_end;
    let mut pos = peak_index;
    while pos < scan_end {
        let end = (pos + frame_len).min(scan_end);
        if peak_amplitude(&samples[pos..end]) < threshold {
            decay_end_index = pos;
            break;
        }
        pos = end;
    }

    let attack_ms = (peak_index as f32 / sr * 1000.0).max(config.attack_floor_ms);
    let decay_ms =
        ((decay_end_index - peak_index) as f32 / sr * 1000.0).max(config.decay_floor_ms);

    log::debug!(
        "Envelope: peak {:.4} at {} ({:.2} ms), decay {:.1} ms",
        peak,
        peak_index,
        attack_ms,
        decay_ms
    );

    Envelope {
        peak_amplitude: peak,
        peak_index,
        attack_ms,
        decay_ms,
        decay_end_index,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn decaying_sine(freq: f32, sr: u32, len: usize, tau_s: f32) -> Vec<f32> {
        (0..len)
            .map(|i| {
                let t = i as f32 / sr as f32;
                (-t / tau_s).exp() * (2.0 * PI * freq * t).sin()
            })
            .collect()
    }

    #[test]
    fn test_fast_attack_sine() {
        let samples = decaying_sine(45.0, 44100, 44100, 0.2);
        let env = measure_envelope(&samples, 44100, &EnvelopeConfig::default());
        // First positive lobe of 45 Hz peaks near 5.5 ms
        assert!(env.attack_ms < 10.0, "attack {}", env.attack_ms);
        // 10% of peak after ~tau * ln(10) = 460 ms
        assert!(env.decay_ms > 350.0 && env.decay_ms < 560.0, "decay {}", env.decay_ms);
    }

    #[test]
    fn test_zero_crossings_do_not_end_decay() {
        let samples: Vec<f32> = (0..44100)
            .map(|i| (2.0 * PI * 200.0 * i as f32 / 44100.0).sin())
            .collect();
        let env = measure_envelope(&samples, 44100, &EnvelopeConfig::default());
        // Steady tone never decays: the scan runs to the cap
        assert_eq!(env.decay_end_index, samples.len());
        assert!(env.decay_ms > 990.0);
    }

    #[test]
    fn test_decay_capped() {
        let samples = vec![0.8f32; 44100 * 4];
        let env = measure_envelope(&samples, 44100, &EnvelopeConfig::default());
        assert!((env.decay_ms - 2000.0).abs() < 0.1);
    }

    #[test]
    fn test_peak_outside_onset_window_ignored() {
        let mut samples = vec![0.0f32; 44100];
        samples[0] = 0.5;
        samples[44100 / 2] = 1.0; // 500 ms later
        let env = measure_envelope(&samples, 44100, &EnvelopeConfig::default());
        assert_eq!(env.peak_index, 0);
        assert_eq!(env.peak_amplitude, 0.5);
    }

    #[test]
    fn test_floors_for_single_click() {
        let mut samples = vec![0.0f32; 4410];
        samples[0] = 1.0;
        let config = EnvelopeConfig::default();
        let env = measure_envelope(&samples, 44100, &config);
        assert_eq!(env.attack_ms, config.attack_floor_ms);
        assert!(env.decay_ms >= config.decay_floor_ms);
        assert!(env.decay_ms > 0.0);
    }

    #[test]
    fn test_empty_input() {
        let env = measure_envelope(&[], 44100, &EnvelopeConfig::default());
        assert_eq!(env, Envelope::default());
    }
}
