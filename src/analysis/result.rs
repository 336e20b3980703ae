//! Analysis result types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::metadata::AnalysisMetadata;

/// Brightness at or below which an unpitched profile counts as silent
const SILENT_BRIGHTNESS: f32 = 1e-6;

/// Measured acoustic fingerprint of one sample file
///
/// All fields are non-negative. The all-zero profile ([`DnaProfile::silent`])
/// stands for silent or unanalyzable audio; every analyzed profile has
/// `attack_ms` and `decay_ms` above their configured floors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnaProfile {
    /// Dominant low-frequency component in Hz (0 = unpitched/noise)
    pub peak_frequency: f32,

    /// Zero-crossing based centroid estimate in Hz
    pub spectral_centroid: f32,

    /// Tonal brightness proxy (0.0-1.0)
    pub brightness: f32,

    /// Onset to amplitude peak, in milliseconds
    pub attack_ms: f32,

    /// Peak to the low-amplitude threshold, in milliseconds
    pub decay_ms: f32,

    /// Sign changes per sample over the active part of the analysis window (0.0-1.0)
    pub zero_crossing_rate: f32,

    /// Best / second-best autocorrelation peak ratio of the pitch estimate
    ///
    /// Values near 1.0 mean two unrelated periodicities were almost equally
    /// strong. 0.0 when no pitch was found.
    pub pitch_confidence: f32,
}

impl DnaProfile {
    /// The all-zero profile used for silent or unanalyzable input
    pub fn silent() -> Self {
        Self::default()
    }

    /// `true` for the silent profile: unpitched, no brightness, no envelope
    pub fn is_silent(&self) -> bool {
        self.peak_frequency == 0.0 && self.brightness <= SILENT_BRIGHTNESS && self.attack_ms == 0.0
    }

    /// `true` when a fundamental frequency was detected
    pub fn is_pitched(&self) -> bool {
        self.peak_frequency > 0.0
    }
}

/// Classification category
///
/// Each category has a canonical `#`-prefixed tag. Categories that appear in
/// a file's path are the strongest evidence the engine has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    /// Kick drum
    Kick,
    /// Bass (808s, reese, sub bass one-shots)
    Bass,
    /// Snare drum
    Snare,
    /// Clap
    Clap,
    /// Hi-hat (closed or open)
    Hat,
    /// Cymbals: crash, ride, splash
    Cymbal,
    /// Generic percussion
    Percussion,
    /// Vocals and vocal chops
    Vocal,
    /// Atmospheres, pads, drones
    Atmos,
    /// Synth stabs, leads, chords
    Synth,
    /// Effects: risers, impacts, sweeps
    Fx,
}

/// Broad grouping used to decide whether acoustics may refine a category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoryFamily {
    /// Drum hits
    Percussive,
    /// Pitched low end
    LowEnd,
    /// Voice
    Vocal,
    /// Pads, synths and effects
    Texture,
}

impl Category {
    /// Every category, in dictionary priority order
    pub const ALL: [Category; 11] = [
        Category::Kick,
        Category::Bass,
        Category::Snare,
        Category::Clap,
        Category::Hat,
        Category::Cymbal,
        Category::Percussion,
        Category::Vocal,
        Category::Atmos,
        Category::Synth,
        Category::Fx,
    ];

    /// Canonical tag, e.g. `#Kick`
    pub fn tag(&self) -> &'static str {
        match self {
            Category::Kick => "#Kick",
            Category::Bass => "#Bass",
            Category::Snare => "#Snare",
            Category::Clap => "#Clap",
            Category::Hat => "#Hat",
            Category::Cymbal => "#Cymbal",
            Category::Percussion => "#Percussion",
            Category::Vocal => "#Vocal",
            Category::Atmos => "#Atmos",
            Category::Synth => "#Synth",
            Category::Fx => "#Fx",
        }
    }

    /// Category whose canonical tag is `tag` (case-insensitive)
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.tag().eq_ignore_ascii_case(tag))
    }

    /// Family this category belongs to
    pub fn family(&self) -> CategoryFamily {
        match self {
            Category::Kick
            | Category::Snare
            | Category::Clap
            | Category::Hat
            | Category::Cymbal
            | Category::Percussion => CategoryFamily::Percussive,
            Category::Bass => CategoryFamily::LowEnd,
            Category::Vocal => CategoryFamily::Vocal,
            Category::Atmos | Category::Synth | Category::Fx => CategoryFamily::Texture,
        }
    }

    /// Whether a path keyword for this category locks it against acoustic reclassification
    ///
    /// Specific drum, bass and vocal identifiers lock. Broad buckets
    /// (generic percussion, textures) only set the master tag.
    pub fn locks_by_default(&self) -> bool {
        !matches!(
            self,
            Category::Percussion | Category::Atmos | Category::Synth | Category::Fx
        )
    }

    /// Categories expected to be dominated by sub/low-mid energy
    pub fn is_low_end(&self) -> bool {
        matches!(self, Category::Kick | Category::Bass)
    }

    /// Categories expected to be bright, noisy transients
    pub fn is_bright(&self) -> bool {
        matches!(self, Category::Hat | Category::Cymbal)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag()[1..])
    }
}

/// Musical key
///
/// Serialized as its name (`"C"`, `"F#m"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Key {
    /// Major key (0 = C, 1 = C#, ..., 11 = B)
    Major(u32),
    /// Minor key (0 = C, 1 = C#, ..., 11 = B)
    Minor(u32),
}

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

impl Key {
    /// Get key name in musical notation (e.g., "C", "Am", "F#", "D#m")
    ///
    /// Flats are spelled as their enharmonic sharps.
    ///
    /// # Example
    ///
    /// ```
    /// use sample_dna::Key;
    ///
    /// assert_eq!(Key::Major(0).name(), "C");
    /// assert_eq!(Key::Minor(9).name(), "Am");
    /// assert_eq!(Key::Minor(1).name(), "C#m");
    /// ```
    pub fn name(&self) -> String {
        match self {
            Key::Major(i) => NOTE_NAMES[*i as usize % 12].to_string(),
            Key::Minor(i) => format!("{}m", NOTE_NAMES[*i as usize % 12]),
        }
    }

    /// Pitch class (0 = C, ..., 11 = B)
    pub fn pitch_class(&self) -> u32 {
        match self {
            Key::Major(i) | Key::Minor(i) => *i % 12,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl FromStr for Key {
    type Err = String;

    /// Parse a name produced by [`Key::name`]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (note, minor) = match s.strip_suffix('m') {
            Some(note) => (note, true),
            None => (s, false),
        };
        let index = NOTE_NAMES
            .iter()
            .position(|&n| n == note)
            .ok_or_else(|| format!("unknown key name: {:?}", s))? as u32;
        Ok(if minor { Key::Minor(index) } else { Key::Major(index) })
    }
}

impl From<Key> for String {
    fn from(key: Key) -> Self {
        key.name()
    }
}

impl TryFrom<String> for Key {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Candidate tags derived from a file's path and name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticTagResult {
    /// Unique tags in priority order: categories, then brands, then genres
    pub tags: Vec<String>,

    /// Strength of the path evidence (0-100)
    pub confidence: u8,

    /// A category keyword matched
    pub is_master_tag: bool,

    /// The master category may not be reclassified by acoustics
    pub is_locked: bool,

    /// Highest-priority matched category
    pub master_category: Option<Category>,

    /// Key parsed from the file name, a descriptive attribute only
    pub musical_key: Option<Key>,
}

/// Analysis flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnalysisFlag {
    /// Waveform was empty, too short or below the silence floor
    Silent,
    /// No fundamental frequency in the plausible range
    Unpitched,
    /// Two unrelated pitch candidates were almost equally strong
    AmbiguousPitch,
    /// Path evidence and acoustic evidence disagree strongly
    EvidenceConflict,
    /// No category keyword; the category comes from acoustic zoning alone
    AcousticOnly,
}

/// Coarse trust level of a classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    /// Below the low-confidence threshold: re-verify before trusting tags
    Low,
    /// Between the thresholds
    Medium,
    /// At or above the high-confidence threshold
    High,
}

impl ConfidenceLevel {
    /// Bucket a 0-100 score
    pub fn from_score(score: u8, low_threshold: u8, high_threshold: u8) -> Self {
        if score < low_threshold {
            ConfidenceLevel::Low
        } else if score >= high_threshold {
            ConfidenceLevel::High
        } else {
            ConfidenceLevel::Medium
        }
    }

    /// Human-readable level: "High", "Medium" or "Low"
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLevel::Low => "Low",
            ConfidenceLevel::Medium => "Medium",
            ConfidenceLevel::High => "High",
        }
    }
}

/// Final output for one analyzed file
///
/// Built once by [`crate::analyze`]; re-analysis produces a new record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationRecord {
    /// Acoustic fingerprint
    pub dna: DnaProfile,

    /// Tags derived from the path and file name, never removed by the veto
    pub source_tags: Vec<String>,

    /// Category, refinement, diagnostic and descriptive tags from fusion
    pub acoustic_tags: Vec<String>,

    /// Trust score for the classification (0-100)
    pub confidence_score: u8,

    /// Bucketed `confidence_score`
    pub confidence_level: ConfidenceLevel,

    /// Authoritative category, if any evidence supported one
    pub category: Option<Category>,

    /// Key parsed from the file name
    pub musical_key: Option<Key>,

    /// Provenance and analysis flags
    pub metadata: AnalysisMetadata,
}

impl ClassificationRecord {
    /// `true` when the score is below the low-confidence threshold
    pub fn is_low_confidence(&self) -> bool {
        self.confidence_level == ConfidenceLevel::Low
    }

    /// `true` when the score is at or above the high-confidence threshold
    pub fn is_high_confidence(&self) -> bool {
        self.confidence_level == ConfidenceLevel::High
    }

    /// `true` when `flag` was raised during analysis
    pub fn has_flag(&self, flag: AnalysisFlag) -> bool {
        self.metadata.flags.contains(&flag)
    }

    /// Source tags followed by acoustic tags, without duplicates
    pub fn all_tags(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::with_capacity(self.source_tags.len() + self.acoustic_tags.len());
        for tag in self.source_tags.iter().chain(self.acoustic_tags.iter()) {
            if !out.contains(&tag.as_str()) {
                out.push(tag);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_name_major() {
        assert_eq!(Key::Major(0).name(), "C");
        assert_eq!(Key::Major(1).name(), "C#");
        assert_eq!(Key::Major(6).name(), "F#");
        assert_eq!(Key::Major(11).name(), "B");
    }

    #[test]
    fn test_key_name_minor() {
        assert_eq!(Key::Minor(0).name(), "Cm");
        assert_eq!(Key::Minor(9).name(), "Am");
        assert_eq!(Key::Minor(11).name(), "Bm");
    }

    #[test]
    fn test_key_parse_from_name() {
        for i in 0..12 {
            assert_eq!(Key::Major(i).name().parse::<Key>(), Ok(Key::Major(i)));
            assert_eq!(Key::Minor(i).name().parse::<Key>(), Ok(Key::Minor(i)));
        }
        assert!("H".parse::<Key>().is_err());
        assert!("".parse::<Key>().is_err());
    }

    #[test]
    fn test_key_serializes_as_name() {
        assert_eq!(serde_json::to_string(&Key::Minor(1)).unwrap(), "\"C#m\"");
        let key: Key = serde_json::from_str("\"Am\"").unwrap();
        assert_eq!(key, Key::Minor(9));
    }

    #[test]
    fn test_category_tags() {
        for category in Category::ALL {
            assert!(category.tag().starts_with('#'));
            assert_eq!(Category::from_tag(category.tag()), Some(category));
        }
        assert_eq!(Category::from_tag("#kick"), Some(Category::Kick));
        assert_eq!(Category::from_tag("#Punchy"), None);
        assert_eq!(Category::Hat.to_string(), "Hat");
    }

    #[test]
    fn test_locking_categories() {
        assert!(Category::Kick.locks_by_default());
        assert!(Category::Bass.locks_by_default());
        assert!(Category::Vocal.locks_by_default());
        assert!(!Category::Percussion.locks_by_default());
        assert!(!Category::Fx.locks_by_default());
    }

    #[test]
    fn test_silent_profile() {
        let dna = DnaProfile::silent();
        assert!(dna.is_silent());
        assert!(!dna.is_pitched());

        let analyzed = DnaProfile {
            attack_ms: 0.1,
            decay_ms: 1.0,
            ..DnaProfile::silent()
        };
        assert!(!analyzed.is_silent());
    }

    #[test]
    fn test_dna_uses_camel_case() {
        let json = serde_json::to_value(DnaProfile::silent()).unwrap();
        assert!(json.get("peakFrequency").is_some());
        assert!(json.get("zeroCrossingRate").is_some());
    }

    #[test]
    fn test_confidence_level_buckets() {
        assert_eq!(ConfidenceLevel::from_score(39, 40, 75), ConfidenceLevel::Low);
        assert_eq!(ConfidenceLevel::from_score(40, 40, 75), ConfidenceLevel::Medium);
        assert_eq!(ConfidenceLevel::from_score(75, 40, 75), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::High.as_str(), "High");
    }
}
