//! Feature extraction modules
//!
//! This module turns a decoded waveform into a [`DnaProfile`]:
//! - Fundamental frequency (autocorrelation with low-frequency bias)
//! - Attack/decay envelope
//! - Zero-crossing rate and brightness proxy
//!
//! All extractors work on the onset of the trimmed signal and never fail:
//! silence and too-short input produce the all-zero profile.

pub mod envelope;
pub mod pitch;
pub mod texture;

use crate::analysis::result::DnaProfile;
use crate::config::AnalysisConfig;
use crate::preprocessing::normalization::{normalize_peak_in_place, peak_amplitude};
use crate::preprocessing::silence::find_onset;

/// Output of [`extract_dna`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureExtraction {
    /// Measured profile (all zeros when `silent`)
    pub dna: DnaProfile,

    /// Index of the first sample above the trim threshold
    pub onset_index: usize,

    /// Input was empty, too short, or below the silence floor
    pub silent: bool,
}

impl FeatureExtraction {
    fn silent(onset_index: usize) -> Self {
        Self {
            dna: DnaProfile::silent(),
            onset_index,
            silent: true,
        }
    }
}

/// Extract the acoustic DNA of a mono waveform
///
/// # Arguments
///
/// * `samples` - Mono samples, untrimmed
/// * `sample_rate` - Sample rate in Hz
/// * `config` - Analysis configuration
///
/// # Returns
///
/// The profile, the onset offset and whether the input was treated as
/// silent. Silent or unanalyzable input degrades to [`DnaProfile::silent`].
///
/// # Example
///
/// ```
/// use sample_dna::config::AnalysisConfig;
/// use sample_dna::features::extract_dna;
///
/// let extraction = extract_dna(&vec![0.0f32; 44100], 44100, &AnalysisConfig::default());
/// assert!(extraction.silent);
/// assert_eq!(extraction.dna.peak_frequency, 0.0);
/// ```
pub fn extract_dna(samples: &[f32], sample_rate: u32, config: &AnalysisConfig) -> FeatureExtraction {
    if sample_rate == 0 {
        log::warn!("Sample rate is 0, treating {} samples as unanalyzable", samples.len());
        return FeatureExtraction::silent(0);
    }

    let pre = &config.preprocessing;
    let onset_index = find_onset(samples, pre.trim_threshold);
    let trimmed = &samples[onset_index..];

    if trimmed.len() < pre.min_analysis_samples {
        log::warn!(
            "Waveform too short after trimming ({} < {} samples), treating as silent",
            trimmed.len(),
            pre.min_analysis_samples
        );
        return FeatureExtraction::silent(onset_index);
    }

    let onset_len = ms_to_samples(config.envelope.onset_window_ms, sample_rate).clamp(1, trimmed.len());
    let onset_peak = peak_amplitude(&trimmed[..onset_len]);
    if onset_peak < pre.silence_floor {
        log::warn!(
            "Onset peak {:.5} below silence floor {:.5}, treating as silent",
            onset_peak,
            pre.silence_floor
        );
        return FeatureExtraction::silent(onset_index);
    }

    log::debug!(
        "Extracting features: {} samples at {} Hz (onset at {})",
        trimmed.len(),
        sample_rate,
        onset_index
    );

    let mut buffer = trimmed.to_vec();
    let mut peak = onset_peak;
    if pre.normalize {
        let gain = normalize_peak_in_place(&mut buffer);
        peak *= gain;
    }

    let pitch = pitch::estimate_fundamental(&buffer, sample_rate, &config.pitch);
    let env = envelope::measure_envelope(&buffer, sample_rate, &config.envelope);
    let zcr = texture::zero_crossing_rate(&buffer, peak, sample_rate, &config.texture);
    let (centroid_hz, brightness) = texture::brightness(zcr, sample_rate, &config.texture);

    FeatureExtraction {
        dna: DnaProfile {
            peak_frequency: pitch.frequency_hz,
            spectral_centroid: centroid_hz,
            brightness,
            attack_ms: env.attack_ms,
            decay_ms: env.decay_ms,
            zero_crossing_rate: zcr,
            pitch_confidence: pitch.confidence_ratio,
        },
        onset_index,
        silent: false,
    }
}

/// Milliseconds to a whole number of samples
pub(crate) fn ms_to_samples(ms: f32, sample_rate: u32) -> usize {
    (ms.max(0.0) * sample_rate as f32 / 1000.0).round() as usize
}
