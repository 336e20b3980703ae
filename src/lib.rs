//! # Sample DNA
//!
//! Acoustic fingerprinting and tag fusion for large audio sample libraries:
//! every one-shot or loop gets a measured "DNA" profile and a set of
//! classification tags reconciled against what its path claims it is.
//!
//! ## Features
//!
//! - **Acoustic DNA**: fundamental frequency (autocorrelation with sub-bass bias),
//!   attack/decay envelope, zero-crossing rate, brightness
//! - **Semantic Tags**: category, brand and genre keywords plus musical key from the path
//! - **Fusion & Veto**: locked path categories are never overwritten; contradictions
//!   are flagged with `#Mislabeled`
//! - **Confidence**: one 0-100 trust score per file
//!
//! ## Quick Start
//!
//! ```
//! use sample_dna::{analyze, AnalysisConfig, Category};
//!
//! let sr = 44100;
//! let samples: Vec<f32> = (0..sr as usize / 2)
//!     .map(|i| {
//!         let t = i as f32 / sr as f32;
//!         (-t / 0.15).exp() * (2.0 * std::f32::consts::PI * 50.0 * t).sin()
//!     })
//!     .collect();
//!
//! let config = AnalysisConfig::default();
//! let (dna, record) = analyze(&samples, sr, "Drums/Kicks", "Sub_Kick.wav", &config);
//!
//! println!("{:.1} Hz, tags {:?}, confidence {}", dna.peak_frequency, record.all_tags(), record.confidence_score);
//! assert_eq!(record.category, Some(Category::Kick));
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Waveform → Preprocessing → Feature Extraction ─┐
//!                                                ├→ Fusion & Veto → Confidence → ClassificationRecord
//! Path + name → Semantic Tagging ────────────────┘
//! ```
//!
//! Analysis is pure and stateless per file. Decoding uses a caller-owned
//! [`io::decoder::AudioDecoder`], one per worker.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod features;
pub mod io;
pub mod preprocessing;
pub mod tagging;

// Re-export main types
pub use analysis::metadata::{AnalysisMetadata, SampleKind};
pub use analysis::result::{
    AnalysisFlag, Category, CategoryFamily, ClassificationRecord, ConfidenceLevel, DnaProfile, Key,
    SemanticTagResult,
};
pub use config::AnalysisConfig;
pub use error::AnalysisError;
pub use io::waveform::Waveform;
pub use tagging::dictionary::TagDictionary;
pub use tagging::tag_from_path;

use analysis::{confidence, fusion};

/// Main analysis function
///
/// Extracts the acoustic DNA of `samples`, tags the file from its path and
/// name, fuses both and scores the result.
///
/// # Arguments
///
/// * `samples` - Mono samples (channel 0 of the decoded file), untrimmed
/// * `sample_rate` - Sample rate in Hz
/// * `path_hint` - Relative path of the file
/// * `name_hint` - File name
/// * `config` - Analysis configuration (validated)
///
/// # Returns
///
/// The DNA profile and the classification record built from it. Never fails:
/// silence, noise and contradictory evidence are reported inside the record.
pub fn analyze(
    samples: &[f32],
    sample_rate: u32,
    path_hint: &str,
    name_hint: &str,
    config: &AnalysisConfig,
) -> (DnaProfile, ClassificationRecord) {
    log::debug!(
        "Analyzing {:?}: {} samples at {} Hz",
        name_hint,
        samples.len(),
        sample_rate
    );

    let extraction = features::extract_dna(samples, sample_rate, config);
    let semantic = tag_from_path(path_hint, name_hint, &config.dictionary);
    let dna = extraction.dna;

    let fused = fusion::classify(&dna, &semantic, config);
    let confidence_score = confidence::score(&dna, &semantic, &fused, &config.zoning, &config.confidence);
    let confidence_level = ConfidenceLevel::from_score(
        confidence_score,
        config.confidence.low_confidence_threshold,
        config.confidence.high_confidence_threshold,
    );

    let duration_seconds = if sample_rate == 0 {
        0.0
    } else {
        samples.len() as f32 / sample_rate as f32
    };

    let record = ClassificationRecord {
        dna,
        source_tags: semantic.tags.clone(),
        acoustic_tags: fused.acoustic_tags,
        confidence_score,
        confidence_level,
        category: fused.category,
        musical_key: semantic.musical_key,
        metadata: AnalysisMetadata {
            sample_rate,
            duration_seconds,
            onset_offset_samples: extraction.onset_index,
            sample_kind: SampleKind::from_duration(duration_seconds, config.preprocessing.loop_min_duration_s),
            flags: fused.flags,
            ..AnalysisMetadata::default()
        },
    };

    if record.is_low_confidence() {
        log::warn!(
            "Low confidence classification for {:?}: {} ({})",
            name_hint,
            record.confidence_score,
            record.confidence_level.as_str()
        );
    }

    (dna, record)
}

/// [`analyze`] a decoded [`Waveform`]
pub fn analyze_waveform(
    waveform: &Waveform,
    path_hint: &str,
    name_hint: &str,
    config: &AnalysisConfig,
) -> (DnaProfile, ClassificationRecord) {
    analyze(waveform.samples(), waveform.sample_rate(), path_hint, name_hint, config)
}
