//! Confidence scoring module
//!
//! Produces the single 0-100 trust score of a classification.
//!
//! # Components
//!
//! 1. **Semantic evidence**: path confidence, capped by evidence class
//!    (locked > master tag > brand/genre only)
//! 2. **Acoustic floor**: categories assigned by zoning alone start from a floor
//! 3. **Consistency bonus**: the acoustics fit the final category
//! 4. **Penalties**: ambiguous pitch estimate, evidence conflict
//!
//! The score never decreases when the semantic confidence rises and the
//! acoustic evidence is held fixed.

use super::fusion::Fusion;
use super::result::{AnalysisFlag, Category, DnaProfile, SemanticTagResult};
use crate::config::{ConfidenceConfig, ZoningConfig};

/// Score a fused classification
///
/// # Arguments
///
/// * `dna` - Acoustic profile
/// * `semantic` - Path tags
/// * `fusion` - Output of [`classify`](super::fusion::classify)
/// * `zoning` - Zoning thresholds, reused for the consistency checks
/// * `config` - Caps, bonus and penalties
///
/// # Returns
///
/// Score clamped to `[0, 100]`
pub fn score(
    dna: &DnaProfile,
    semantic: &SemanticTagResult,
    fusion: &Fusion,
    zoning: &ZoningConfig,
    config: &ConfidenceConfig,
) -> u8 {
    let semantic_confidence = semantic.confidence as f32;
    let cap = if semantic.is_locked {
        config.locked_cap
    } else if semantic.is_master_tag {
        config.master_cap
    } else {
        config.descriptive_cap
    };
    let mut total = semantic_confidence.min(cap);

    if fusion.has_flag(AnalysisFlag::Silent) {
        return clamp_score(total);
    }

    if fusion.has_flag(AnalysisFlag::AcousticOnly) {
        total = total.max(config.acoustic_floor);
    }

    let consistent = match (fusion.category, fusion.zone) {
        (Some(category), Some(zone)) => is_consistent(dna, category, zone, zoning),
        _ => false,
    };
    if consistent {
        total += config.consistency_bonus;
    }

    if fusion.has_flag(AnalysisFlag::AmbiguousPitch) {
        total -= config.ambiguous_pitch_penalty;
    }
    if fusion.conflict {
        total -= config.conflict_penalty;
    }

    let score = clamp_score(total);
    log::debug!(
        "Confidence {} (semantic {:.0}/{:.0}, consistent {}, conflict {})",
        score,
        semantic_confidence,
        cap,
        consistent,
        fusion.conflict
    );
    score
}

/// Whether the acoustic profile fits `category`
fn is_consistent(dna: &DnaProfile, category: Category, zone: Category, zoning: &ZoningConfig) -> bool {
    let f = dna.peak_frequency;
    match category {
        Category::Kick => zone == Category::Kick,
        Category::Bass => {
            f > zoning.sustained_min_hz
                && f < zoning.sustained_max_hz
                && dna.brightness < zoning.noisy_min_brightness
        }
        Category::Hat | Category::Cymbal => {
            dna.brightness > zoning.noisy_min_brightness || dna.zero_crossing_rate > zoning.noisy_min_zcr
        }
        Category::Snare | Category::Clap => dna.brightness > zoning.kick_max_brightness,
        Category::Percussion => zone.family() == category.family(),
        Category::Vocal | Category::Atmos | Category::Synth | Category::Fx => false,
    }
}

fn clamp_score(value: f32) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}
