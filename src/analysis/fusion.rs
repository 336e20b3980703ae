//! Fusion & veto classification
//!
//! Merges path evidence and acoustic evidence into the final tag set. Priority:
//!
//! 1. **Locked** path category: authoritative. Acoustics may only add
//!    descriptive tags and, at most, a conflict marker.
//! 2. **Master** path category (unlocked): kept, and refined with the acoustic
//!    zone when both belong to the same family.
//! 3. **No category**: the acoustic zone alone assigns it.
//!
//! Contradicting evidence is flagged with `#Mislabeled`, never resolved by
//! dropping the path tag.

use super::result::{AnalysisFlag, Category, DnaProfile, SemanticTagResult};
use crate::config::{AnalysisConfig, ConflictConfig, DescriptorConfig, ZoningConfig};

/// Tag added when path and acoustic evidence disagree strongly
pub const MISLABELED_TAG: &str = "#Mislabeled";

/// Tag added for silent or unanalyzable audio
pub const SILENT_TAG: &str = "#Silent";

/// Outcome of [`classify`]
#[derive(Debug, Clone, PartialEq)]
pub struct Fusion {
    /// Authoritative category
    pub category: Option<Category>,

    /// Acoustic zone of the profile, `None` for silent input
    pub zone: Option<Category>,

    /// Category, refinement, diagnostic and descriptive tags
    pub acoustic_tags: Vec<String>,

    /// Path evidence contradicts the acoustics
    pub conflict: bool,

    /// Flags raised while classifying
    pub flags: Vec<AnalysisFlag>,
}

impl Fusion {
    /// `true` when `flag` was raised
    pub fn has_flag(&self, flag: AnalysisFlag) -> bool {
        self.flags.contains(&flag)
    }
}

/// Acoustic-only category from frequency/brightness zoning
///
/// Checked in order: low and dark is a kick, bright or noisy is a hat, a
/// low/mid pitch with a slow attack is bass, anything else is percussion.
pub fn zone(dna: &DnaProfile, config: &ZoningConfig) -> Category {
    let f = dna.peak_frequency;
    if f > config.kick_min_hz && f < config.kick_max_hz && dna.brightness < config.kick_max_brightness {
        Category::Kick
    } else if dna.brightness > config.noisy_min_brightness || dna.zero_crossing_rate > config.noisy_min_zcr {
        Category::Hat
    } else if f > config.sustained_min_hz
        && f < config.sustained_max_hz
        && dna.attack_ms > config.sustained_min_attack_ms
    {
        Category::Bass
    } else {
        Category::Percussion
    }
}

/// Descriptive tags, independent of category
pub fn descriptor_tags(dna: &DnaProfile, config: &DescriptorConfig) -> Vec<String> {
    let mut tags = Vec::new();
    if dna.attack_ms < config.punchy_max_attack_ms {
        tags.push("#Punchy");
    }
    if dna.decay_ms < config.tight_max_decay_ms {
        tags.push("#Tight");
    }
    if dna.decay_ms > config.long_min_decay_ms {
        tags.push("#Long");
    }
    if dna.peak_frequency > 0.0 && dna.peak_frequency < config.sub_max_hz {
        tags.push("#Sub");
    }
    if dna.brightness > config.bright_min_brightness {
        tags.push("#Bright");
    }
    if dna.zero_crossing_rate > config.gritty_min_zcr {
        tags.push("#Gritty");
    }
    tags.into_iter().map(String::from).collect()
}

/// `true` when a path category is strongly contradicted by the acoustics
///
/// A low-end label on bright noisy audio, or a bright label on dark
/// low-end audio.
pub fn detect_conflict(dna: &DnaProfile, label: Category, zone: Category, config: &ConflictConfig) -> bool {
    (label.is_low_end() && zone == Category::Hat && dna.spectral_centroid > config.bright_centroid_hz)
        || (label.is_bright() && zone == Category::Kick && dna.spectral_centroid < config.dark_centroid_hz)
}

/// Combine a DNA profile and path tags into the final classification
///
/// # Example
///
/// ```
/// use sample_dna::analysis::fusion::classify;
/// use sample_dna::{tag_from_path, AnalysisConfig, Category, DnaProfile};
///
/// let config = AnalysisConfig::default();
/// let semantic = tag_from_path("Kicks", "Hard_Kick.wav", &config.dictionary);
/// // Bright, noisy audio filed as a kick
/// let dna = DnaProfile {
///     peak_frequency: 0.0,
///     spectral_centroid: 8000.0,
///     brightness: 0.67,
///     attack_ms: 0.5,
///     decay_ms: 20.0,
///     zero_crossing_rate: 0.36,
///     pitch_confidence: 0.0,
/// };
///
/// let fusion = classify(&dna, &semantic, &config);
/// assert_eq!(fusion.category, Some(Category::Kick));
/// assert!(fusion.conflict);
/// assert!(fusion.acoustic_tags.contains(&"#Mislabeled".to_string()));
/// ```
pub fn classify(dna: &DnaProfile, semantic: &SemanticTagResult, config: &AnalysisConfig) -> Fusion {
    if dna.is_silent() {
        log::debug!("Silent profile, keeping path category {:?}", semantic.master_category);
        return Fusion {
            category: semantic.master_category,
            zone: None,
            acoustic_tags: vec![SILENT_TAG.to_string()],
            conflict: false,
            flags: vec![AnalysisFlag::Silent],
        };
    }

    let zone = zone(dna, &config.zoning);
    let mut tags: Vec<String> = Vec::new();
    let mut flags = Vec::new();
    let mut conflict = false;

    let category = match semantic.master_category {
        Some(master) => {
            tags.push(master.tag().to_string());
            if !semantic.is_locked && zone != master && zone.family() == master.family() {
                tags.push(zone.tag().to_string());
            }

            conflict = detect_conflict(dna, master, zone, &config.conflict);
            if conflict {
                log::warn!(
                    "Evidence conflict: path says {} but audio zones as {} (centroid {:.0} Hz)",
                    master,
                    zone,
                    dna.spectral_centroid
                );
            }
            master
        }
        None => {
            tags.push(zone.tag().to_string());
            flags.push(AnalysisFlag::AcousticOnly);
            zone
        }
    };

    if !dna.is_pitched() {
        flags.push(AnalysisFlag::Unpitched);
    } else if dna.pitch_confidence < config.pitch.low_confidence_ratio {
        flags.push(AnalysisFlag::AmbiguousPitch);
    }

    if conflict {
        tags.push(MISLABELED_TAG.to_string());
        flags.push(AnalysisFlag::EvidenceConflict);
    }

    for tag in descriptor_tags(dna, &config.descriptors) {
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }

    log::debug!(
        "Fused {} (zone {}, locked {}): {:?}",
        category,
        zone,
        semantic.is_locked,
        tags
    );

    Fusion {
        category: Some(category),
        zone: Some(zone),
        acoustic_tags: tags,
        conflict,
        flags,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kick_dna() -> DnaProfile {
        DnaProfile {
            peak_frequency: 45.0,
            spectral_centroid: 45.0,
            brightness: 0.004,
            attack_ms: 5.0,
            decay_ms: 450.0,
            zero_crossing_rate: 0.002,
            pitch_confidence: 10.0,
        }
    }

    fn hat_dna() -> DnaProfile {
        DnaProfile {
            peak_frequency: 0.0,
            spectral_centroid: 9000.0,
            brightness: 0.75,
            attack_ms: 0.2,
            decay_ms: 40.0,
            zero_crossing_rate: 0.41,
            pitch_confidence: 0.0,
        }
    }

    fn semantic(category: Option<Category>, locked: bool) -> SemanticTagResult {
        SemanticTagResult {
            tags: category.map(|c| vec![c.tag().to_string()]).unwrap_or_default(),
            confidence: if category.is_some() { 100 } else { 0 },
            is_master_tag: category.is_some(),
            is_locked: locked,
            master_category: category,
            musical_key: None,
        }
    }

    #[test]
    fn test_zoning_order() {
        let config = ZoningConfig::default();
        assert_eq!(zone(&kick_dna(), &config), Category::Kick);
        assert_eq!(zone(&hat_dna(), &config), Category::Hat);

        let bass = DnaProfile {
            peak_frequency: 110.0,
            brightness: 0.05,
            attack_ms: 35.0,
            zero_crossing_rate: 0.01,
            ..kick_dna()
        };
        assert_eq!(zone(&bass, &config), Category::Bass);

        let snappy = DnaProfile {
            peak_frequency: 180.0,
            brightness: 0.4,
            attack_ms: 1.0,
            zero_crossing_rate: 0.2,
            ..kick_dna()
        };
        assert_eq!(zone(&snappy, &config), Category::Percussion);
    }

    #[test]
    fn test_locked_category_only() {
        let fusion = classify(&hat_dna(), &semantic(Some(Category::Snare), true), &AnalysisConfig::default());
        assert_eq!(fusion.category, Some(Category::Snare));
        assert!(!fusion.acoustic_tags.contains(&"#Hat".to_string()));
        assert_eq!(fusion.acoustic_tags[0], "#Snare");
    }

    #[test]
    fn test_master_refined_within_family() {
        let fusion = classify(
            &hat_dna(),
            &semantic(Some(Category::Percussion), false),
            &AnalysisConfig::default(),
        );
        assert_eq!(fusion.category, Some(Category::Percussion));
        assert_eq!(&fusion.acoustic_tags[..2], &["#Percussion", "#Hat"]);
    }

    #[test]
    fn test_master_not_overwritten_across_families() {
        let fusion = classify(&kick_dna(), &semantic(Some(Category::Synth), false), &AnalysisConfig::default());
        assert_eq!(fusion.category, Some(Category::Synth));
        assert!(!fusion.acoustic_tags.contains(&"#Kick".to_string()));
    }

    #[test]
    fn test_acoustic_only() {
        let fusion = classify(&hat_dna(), &semantic(None, false), &AnalysisConfig::default());
        assert_eq!(fusion.category, Some(Category::Hat));
        assert!(fusion.has_flag(AnalysisFlag::AcousticOnly));
        assert!(fusion.has_flag(AnalysisFlag::Unpitched));
    }

    #[test]
    fn test_conflict_both_directions() {
        let config = AnalysisConfig::default();

        let fusion = classify(&hat_dna(), &semantic(Some(Category::Kick), true), &config);
        assert!(fusion.conflict);
        assert!(fusion.has_flag(AnalysisFlag::EvidenceConflict));
        assert_eq!(fusion.category, Some(Category::Kick));
        assert!(fusion.acoustic_tags.contains(&MISLABELED_TAG.to_string()));

        let fusion = classify(&kick_dna(), &semantic(Some(Category::Hat), true), &config);
        assert!(fusion.conflict);
        assert_eq!(fusion.category, Some(Category::Hat));

        let fusion = classify(&kick_dna(), &semantic(Some(Category::Kick), true), &config);
        assert!(!fusion.conflict);
    }

    #[test]
    fn test_descriptors() {
        let config = DescriptorConfig::default();
        assert_eq!(descriptor_tags(&kick_dna(), &config), vec!["#Punchy", "#Sub"]);
        assert_eq!(descriptor_tags(&hat_dna(), &config), vec!["#Punchy", "#Tight", "#Bright", "#Gritty"]);

        let pad = DnaProfile {
            peak_frequency: 220.0,
            attack_ms: 300.0,
            decay_ms: 1800.0,
            brightness: 0.3,
            zero_crossing_rate: 0.1,
            ..kick_dna()
        };
        assert_eq!(descriptor_tags(&pad, &config), vec!["#Long"]);
    }

    #[test]
    fn test_ambiguous_pitch_flag() {
        let dna = DnaProfile {
            pitch_confidence: 1.1,
            ..kick_dna()
        };
        let fusion = classify(&dna, &semantic(Some(Category::Kick), true), &AnalysisConfig::default());
        assert!(fusion.has_flag(AnalysisFlag::AmbiguousPitch));
        assert!(!fusion.has_flag(AnalysisFlag::Unpitched));
    }

    #[test]
    fn test_silent_profile() {
        let fusion = classify(
            &DnaProfile::silent(),
            &semantic(Some(Category::Kick), true),
            &AnalysisConfig::default(),
        );
        assert_eq!(fusion.acoustic_tags, vec![SILENT_TAG]);
        assert_eq!(fusion.category, Some(Category::Kick));
        assert_eq!(fusion.flags, vec![AnalysisFlag::Silent]);
        assert_eq!(fusion.zone, None);
    }
}
