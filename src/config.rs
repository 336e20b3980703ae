//! Configuration parameters for sample analysis
//!
//! Every heuristic threshold used by the engine lives here. None of these are
//! protocol: they were tuned on percussive electronic sample packs and can be
//! overridden from JSON. Only the relative priority rules (locked > master tag
//! > acoustic zoning, low-frequency bias, bounded onset windows) are fixed in
//! code.
//!
//! # Example
//!
//! ```
//! use sample_dna::AnalysisConfig;
//!
//! let config = AnalysisConfig::from_json_str(r#"{ "pitch": { "low_freq_bias": 2.5 } }"#)?;
//! assert_eq!(config.pitch.low_freq_bias, 2.5);
//! assert_eq!(config.pitch.window_size, 4096); // untouched fields keep defaults
//! # Ok::<(), sample_dna::AnalysisError>(())
//! ```

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::tagging::dictionary::TagDictionary;

/// Waveform preprocessing parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessingConfig {
    /// Linear amplitude a sample must exceed to count as the onset (default: 0.001)
    pub trim_threshold: f32,

    /// Peak-normalize the trimmed waveform before feature extraction (default: true)
    ///
    /// The silence floor is always checked on the un-normalized signal.
    pub normalize: bool,

    /// Trimmed waveforms shorter than this are unanalyzable (default: 128)
    pub min_analysis_samples: usize,

    /// Onset-window peak below this linear amplitude is treated as silence (default: 0.003)
    pub silence_floor: f32,

    /// Untrimmed duration at or above which a file is a loop rather than a one-shot (default: 2.0)
    pub loop_min_duration_s: f32,
}

impl Default for PreprocessingConfig {
    fn default() -> Self {
        Self {
            trim_threshold: 0.001,
            normalize: true,
            min_analysis_samples: 128,
            silence_floor: 0.003,
            loop_min_duration_s: 2.0,
        }
    }
}

/// Fundamental frequency estimation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PitchConfig {
    /// Autocorrelation window taken from the onset, in samples (default: 4096)
    ///
    /// Widened when shorter than two periods of `min_freq_hz`.
    pub window_size: usize,

    /// Lowest candidate frequency searched (default: 20.0 Hz)
    pub min_freq_hz: f32,

    /// Highest candidate frequency searched (default: 500.0 Hz)
    pub max_freq_hz: f32,

    /// Results below this are rejected as unpitched (default: 20.0 Hz)
    pub plausible_min_hz: f32,

    /// Results above this are rejected as unpitched (default: 1200.0 Hz)
    pub plausible_max_hz: f32,

    /// Lower edge of the sub-bass band receiving the bias (default: 30.0 Hz)
    pub bias_band_low_hz: f32,

    /// Upper edge of the sub-bass band receiving the bias (default: 100.0 Hz)
    pub bias_band_high_hz: f32,

    /// Multiplier applied to correlation peaks inside the bias band (default: 2.0)
    pub low_freq_bias: f32,

    /// Minimum normalized correlation for a peak to count as pitched (default: 0.5)
    pub min_periodicity: f32,

    /// Peaks within this fraction of the best score are treated as ties, and
    /// the shortest lag wins (default: 0.05)
    pub octave_tolerance: f32,

    /// Ratio reported when no competing peak exists (default: 10.0)
    pub max_confidence_ratio: f32,

    /// Ratios below this mark the estimate as ambiguous (default: 1.3)
    pub low_confidence_ratio: f32,
}

impl Default for PitchConfig {
    fn default() -> Self {
        Self {
            window_size: 4096,
            min_freq_hz: 20.0,
            max_freq_hz: 500.0,
            plausible_min_hz: 20.0,
            plausible_max_hz: 1200.0,
            bias_band_low_hz: 30.0,
            bias_band_high_hz: 100.0,
            low_freq_bias: 2.0,
            min_periodicity: 0.5,
            octave_tolerance: 0.05,
            max_confidence_ratio: 10.0,
            low_confidence_ratio: 1.3,
        }
    }
}

/// Attack/decay envelope parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvelopeConfig {
    /// Leading window searched for the attack peak (default: 100.0 ms)
    pub onset_window_ms: f32,

    /// Decay ends where the frame envelope falls below this fraction of the peak (default: 0.1)
    pub decay_fraction: f32,

    /// Hard cap on the decay scan (default: 2000.0 ms)
    pub decay_cap_ms: f32,

    /// Frame length of the peak-hold envelope used for the decay scan (default: 10.0 ms)
    pub envelope_frame_ms: f32,

    /// Smallest attack reported for non-silent input (default: 0.1 ms)
    pub attack_floor_ms: f32,

    /// Smallest decay reported for non-silent input (default: 1.0 ms)
    pub decay_floor_ms: f32,
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self {
            onset_window_ms: 100.0,
            decay_fraction: 0.1,
            decay_cap_ms: 2000.0,
            envelope_frame_ms: 10.0,
            attack_floor_ms: 0.1,
            decay_floor_ms: 1.0,
        }
    }
}

/// Zero-crossing rate and brightness parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureConfig {
    /// Leading window over which crossings are counted (default: 1000.0 ms)
    pub zcr_window_ms: f32,

    /// Activity frame length for gating (default: 2.0 ms)
    pub zcr_frame_ms: f32,

    /// Frames whose peak is below this fraction of the onset peak are skipped (default: 0.02)
    pub zcr_gate_fraction: f32,

    /// Centroid estimate mapping to brightness 1.0 (default: 12000.0 Hz)
    pub brightness_reference_hz: f32,
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            zcr_window_ms: 1000.0,
            zcr_frame_ms: 2.0,
            zcr_gate_fraction: 0.02,
            brightness_reference_hz: 12000.0,
        }
    }
}

/// Acoustic-only category zoning thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoningConfig {
    /// Kick zone lower frequency bound, exclusive (default: 20.0 Hz)
    pub kick_min_hz: f32,
    /// Kick zone upper frequency bound, exclusive (default: 110.0 Hz)
    pub kick_max_hz: f32,
    /// Kick zone maximum brightness (default: 0.25)
    pub kick_max_brightness: f32,
    /// Brightness above which audio is noisy/textured (default: 0.6)
    pub noisy_min_brightness: f32,
    /// Zero-crossing rate above which audio is noisy/textured (default: 0.3)
    pub noisy_min_zcr: f32,
    /// Sustained low/mid zone lower bound (default: 30.0 Hz)
    pub sustained_min_hz: f32,
    /// Sustained low/mid zone upper bound (default: 200.0 Hz)
    pub sustained_max_hz: f32,
    /// Sustained low/mid zone minimum attack (default: 20.0 ms)
    pub sustained_min_attack_ms: f32,
}

impl Default for ZoningConfig {
    fn default() -> Self {
        Self {
            kick_min_hz: 20.0,
            kick_max_hz: 110.0,
            kick_max_brightness: 0.25,
            noisy_min_brightness: 0.6,
            noisy_min_zcr: 0.3,
            sustained_min_hz: 30.0,
            sustained_max_hz: 200.0,
            sustained_min_attack_ms: 20.0,
        }
    }
}

/// Thresholds for descriptive (non-category) acoustic tags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DescriptorConfig {
    /// `#Punchy` when attack is shorter (default: 10.0 ms)
    pub punchy_max_attack_ms: f32,
    /// `#Tight` when decay is shorter (default: 150.0 ms)
    pub tight_max_decay_ms: f32,
    /// `#Long` when decay is longer (default: 1200.0 ms)
    pub long_min_decay_ms: f32,
    /// `#Sub` when a pitch below this was found (default: 60.0 Hz)
    pub sub_max_hz: f32,
    /// `#Bright` when brightness is higher (default: 0.6)
    pub bright_min_brightness: f32,
    /// `#Gritty` when zero-crossing rate is higher (default: 0.4)
    pub gritty_min_zcr: f32,
}

impl Default for DescriptorConfig {
    fn default() -> Self {
        Self {
            punchy_max_attack_ms: 10.0,
            tight_max_decay_ms: 150.0,
            long_min_decay_ms: 1200.0,
            sub_max_hz: 60.0,
            bright_min_brightness: 0.6,
            gritty_min_zcr: 0.4,
        }
    }
}

/// Semantic/acoustic conflict detection thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConflictConfig {
    /// A low-end label on audio brighter than this (centroid estimate) is a conflict (default: 4000.0 Hz)
    pub bright_centroid_hz: f32,
    /// A bright label on audio darker than this (centroid estimate) is a conflict (default: 300.0 Hz)
    pub dark_centroid_hz: f32,
}

impl Default for ConflictConfig {
    fn default() -> Self {
        Self {
            bright_centroid_hz: 4000.0,
            dark_centroid_hz: 300.0,
        }
    }
}

/// Confidence scorer weights (all on the 0-100 scale)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceConfig {
    /// Maximum contribution of a locked semantic result (default: 70)
    pub locked_cap: f32,
    /// Maximum contribution of an unlocked master tag (default: 60)
    pub master_cap: f32,
    /// Maximum contribution of brand/genre-only evidence (default: 40)
    pub descriptive_cap: f32,
    /// Floor used when the category comes from acoustics alone (default: 25)
    pub acoustic_floor: f32,
    /// Added when the acoustics agree with the final category (default: 20)
    pub consistency_bonus: f32,
    /// Subtracted when the pitch estimate is ambiguous (default: 15)
    pub ambiguous_pitch_penalty: f32,
    /// Subtracted when semantic and acoustic evidence conflict (default: 25)
    pub conflict_penalty: f32,
    /// Scores below this are low confidence (default: 40)
    pub low_confidence_threshold: u8,
    /// Scores at or above this are high confidence (default: 75)
    pub high_confidence_threshold: u8,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            locked_cap: 70.0,
            master_cap: 60.0,
            descriptive_cap: 40.0,
            acoustic_floor: 25.0,
            consistency_bonus: 20.0,
            ambiguous_pitch_penalty: 15.0,
            conflict_penalty: 25.0,
            low_confidence_threshold: 40,
            high_confidence_threshold: 75,
        }
    }
}

/// Analysis configuration parameters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Trimming, normalization and silence handling
    pub preprocessing: PreprocessingConfig,
    /// Fundamental frequency estimation
    pub pitch: PitchConfig,
    /// Attack/decay measurement
    pub envelope: EnvelopeConfig,
    /// Zero-crossing rate and brightness
    pub texture: TextureConfig,
    /// Acoustic-only category zoning
    pub zoning: ZoningConfig,
    /// Descriptive tag thresholds
    pub descriptors: DescriptorConfig,
    /// Conflict detection thresholds
    pub conflict: ConflictConfig,
    /// Confidence scorer weights
    pub confidence: ConfidenceConfig,
    /// Category, brand and genre keyword dictionaries
    pub dictionary: TagDictionary,
}

impl AnalysisConfig {
    /// Parse a (possibly partial) JSON configuration and validate it
    ///
    /// Missing fields fall back to their defaults. Dictionary keywords are
    /// upper-cased the same way [`TagDictionary::from_json_str`] does.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidConfig` on malformed JSON or when
    /// [`validate`](Self::validate) rejects a value.
    pub fn from_json_str(json: &str) -> Result<Self, AnalysisError> {
        let mut config: AnalysisConfig = serde_json::from_str(json)?;
        config.dictionary = config.dictionary.normalized();
        config.validate()?;
        log::debug!(
            "Loaded analysis config: {} category rules, {} brands, {} genres",
            config.dictionary.categories.len(),
            config.dictionary.brands.len(),
            config.dictionary.genres.len()
        );
        Ok(config)
    }

    /// Check every parameter for internal consistency
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidConfig` naming the first offending field.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        let p = &self.preprocessing;
        require(p.trim_threshold >= 0.0, "preprocessing.trim_threshold must be >= 0")?;
        require(p.silence_floor >= 0.0, "preprocessing.silence_floor must be >= 0")?;
        require(p.min_analysis_samples > 0, "preprocessing.min_analysis_samples must be > 0")?;
        require(p.loop_min_duration_s > 0.0, "preprocessing.loop_min_duration_s must be > 0")?;

        let pitch = &self.pitch;
        require(pitch.window_size >= 2, "pitch.window_size must be >= 2")?;
        require(
            pitch.min_freq_hz > 0.0 && pitch.min_freq_hz < pitch.max_freq_hz,
            "pitch search band must satisfy 0 < min_freq_hz < max_freq_hz",
        )?;
        require(
            pitch.plausible_min_hz >= 0.0 && pitch.plausible_min_hz < pitch.plausible_max_hz,
            "pitch plausible range must satisfy 0 <= plausible_min_hz < plausible_max_hz",
        )?;
        require(
            pitch.bias_band_low_hz <= pitch.bias_band_high_hz,
            "pitch bias band is inverted",
        )?;
        require(pitch.low_freq_bias >= 1.0, "pitch.low_freq_bias must be >= 1")?;
        require(
            (0.0..1.0).contains(&pitch.min_periodicity),
            "pitch.min_periodicity must be in [0, 1)",
        )?;
        require(
            (0.0..1.0).contains(&pitch.octave_tolerance),
            "pitch.octave_tolerance must be in [0, 1)",
        )?;
        require(
            pitch.max_confidence_ratio >= pitch.low_confidence_ratio && pitch.low_confidence_ratio > 0.0,
            "pitch confidence ratios must satisfy 0 < low_confidence_ratio <= max_confidence_ratio",
        )?;

        let env = &self.envelope;
        require(env.onset_window_ms > 0.0, "envelope.onset_window_ms must be > 0")?;
        require(env.decay_cap_ms > 0.0, "envelope.decay_cap_ms must be > 0")?;
        require(env.envelope_frame_ms > 0.0, "envelope.envelope_frame_ms must be > 0")?;
        require(is_fraction(env.decay_fraction), "envelope.decay_fraction must be in (0, 1)")?;
        require(
            env.attack_floor_ms > 0.0 && env.decay_floor_ms > 0.0,
            "envelope floors must be > 0",
        )?;

        let tex = &self.texture;
        require(tex.zcr_window_ms > 0.0, "texture.zcr_window_ms must be > 0")?;
        require(tex.zcr_frame_ms > 0.0, "texture.zcr_frame_ms must be > 0")?;
        require(
            (0.0..1.0).contains(&tex.zcr_gate_fraction),
            "texture.zcr_gate_fraction must be in [0, 1)",
        )?;
        require(tex.brightness_reference_hz > 0.0, "texture.brightness_reference_hz must be > 0")?;

        let z = &self.zoning;
        require(z.kick_min_hz < z.kick_max_hz, "zoning kick band is inverted")?;
        require(z.sustained_min_hz < z.sustained_max_hz, "zoning sustained band is inverted")?;

        let c = &self.confidence;
        require(
            [c.locked_cap, c.master_cap, c.descriptive_cap, c.acoustic_floor]
                .iter()
                .all(|v| (0.0..=100.0).contains(v)),
            "confidence caps and floor must be within [0, 100]",
        )?;
        require(
            c.low_confidence_threshold <= c.high_confidence_threshold,
            "confidence thresholds are inverted",
        )?;

        self.dictionary.validate()
    }
}

fn is_fraction(value: f32) -> bool {
    value > 0.0 && value < 1.0
}

fn require(condition: bool, message: &str) -> Result<(), AnalysisError> {
    if condition {
        Ok(())
    } else {
        Err(AnalysisError::InvalidConfig(message.to_string()))
    }
}
