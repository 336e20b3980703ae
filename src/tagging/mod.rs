//! Semantic tagging from file paths and names
//!
//! Path evidence is the author's explicit intent and is treated as the
//! strongest signal the engine has:
//! - Category keywords (substring match, master tag, may lock)
//! - Brand and genre dictionaries (whole-token match, descriptive only)
//! - Musical key from the file name
//!
//! Tagging is a pure function of the path, name and dictionary.

pub mod dictionary;
pub mod key;

use crate::analysis::result::SemanticTagResult;
use dictionary::TagDictionary;

/// Confidence of a category keyword match
pub const CATEGORY_CONFIDENCE: u8 = 100;

/// Confidence of a brand token match
pub const BRAND_CONFIDENCE: u8 = 50;

/// Confidence of a genre token match
pub const GENRE_CONFIDENCE: u8 = 40;

/// Derive candidate tags from a relative path and file name
///
/// # Arguments
///
/// * `path` - Slash-delimited relative path (may already end with the name)
/// * `name` - File name
/// * `dictionary` - Category, brand and genre keywords
///
/// # Returns
///
/// Tags ordered categories first, then brands, then genres, each tag once.
///
/// # Example
///
/// ```
/// use sample_dna::{tag_from_path, Category, TagDictionary};
///
/// let result = tag_from_path("Cymatics/Techno/Kicks", "Deep_Kick_01.wav", &TagDictionary::default());
/// assert_eq!(result.master_category, Some(Category::Kick));
/// assert!(result.is_locked);
/// assert_eq!(result.tags, vec!["#Kick", "#Cymatics", "#Techno"]);
/// assert_eq!(result.confidence, 100);
/// ```
pub fn tag_from_path(path: &str, name: &str, dictionary: &TagDictionary) -> SemanticTagResult {
    let full_path = format!("/{}/{}", path, name).to_uppercase();
    let mut result = SemanticTagResult::default();

    for rule in &dictionary.categories {
        if !full_path.contains(rule.keyword.as_str()) {
            continue;
        }
        push_unique(&mut result.tags, rule.category.tag().to_string());
        if result.master_category.is_none() {
            result.master_category = Some(rule.category);
            result.is_master_tag = true;
            result.is_locked = rule.locks();
            result.confidence = CATEGORY_CONFIDENCE;
        }
    }

    let tokens = tokenize(&full_path);

    for token in &tokens {
        if let Some(brand) = dictionary.brands.get(*token) {
            push_unique(&mut result.tags, format_tag(brand));
            result.confidence = result.confidence.max(BRAND_CONFIDENCE);
        }
    }

    for token in &tokens {
        if let Some(genre) = dictionary.genres.get(*token) {
            push_unique(&mut result.tags, format_tag(genre));
            result.confidence = result.confidence.max(GENRE_CONFIDENCE);
        }
    }

    result.musical_key = key::parse_musical_key(name);

    log::debug!(
        "Tagged {:?}: {:?} (confidence {}, locked {})",
        name,
        result.tags,
        result.confidence,
        result.is_locked
    );

    result
}

/// `#`-prefixed tag with spaces replaced by underscores
pub fn format_tag(value: &str) -> String {
    format!("#{}", value.trim().replace(' ', "_"))
}

/// Path and word separators used for tokenizing
pub(crate) fn is_separator(c: char) -> bool {
    matches!(c, '/' | '\\' | '_' | '-' | ' ' | '.')
}

/// Non-empty tokens between separators
pub(crate) fn tokenize(text: &str) -> Vec<&str> {
    text.split(is_separator).filter(|t| !t.is_empty()).collect()
}

fn push_unique(tags: &mut Vec<String>, tag: String) {
    if !tags.contains(&tag) {
        tags.push(tag);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::result::{Category, Key};

    fn tag(path: &str, name: &str) -> SemanticTagResult {
        tag_from_path(path, name, &TagDictionary::default())
    }

    #[test]
    fn test_locked_kick() {
        let result = tag("Kicks/Deep_Kick_01.wav", "Deep_Kick_01.wav");
        assert_eq!(result.tags, vec!["#Kick"]);
        assert!(result.is_master_tag);
        assert!(result.is_locked);
        assert_eq!(result.confidence, 100);
        assert_eq!(result.musical_key, None);
    }

    #[test]
    fn test_no_keywords() {
        let result = tag("Loops/Drumloop.wav", "Drumloop.wav");
        assert!(result.tags.is_empty());
        assert!(!result.is_master_tag);
        assert!(!result.is_locked);
        assert_eq!(result.master_category, None);
        assert_eq!(result.confidence, 0);
    }

    #[test]
    fn test_unlocked_master_category() {
        let result = tag("Textures", "Dark_Pad_Am.wav");
        assert_eq!(result.master_category, Some(Category::Atmos));
        assert!(result.is_master_tag);
        assert!(!result.is_locked);
        assert_eq!(result.musical_key, Some(Key::Minor(9)));
    }

    #[test]
    fn test_brand_and_genre_confidence() {
        let result = tag("SampleMagic/House", "Groove_01.wav");
        assert_eq!(result.tags, vec!["#Sample_Magic", "#House"]);
        assert_eq!(result.confidence, BRAND_CONFIDENCE);
        assert!(!result.is_master_tag);

        let result = tag("Dubstep", "Groove_01.wav");
        assert_eq!(result.tags, vec!["#Dubstep"]);
        assert_eq!(result.confidence, GENRE_CONFIDENCE);
    }

    #[test]
    fn test_multiple_categories_first_is_master() {
        let result = tag("Drums/Snares", "Snare_Clap_Layer.wav");
        assert_eq!(result.tags, vec!["#Snare", "#Clap"]);
        assert_eq!(result.master_category, Some(Category::Snare));
    }

    #[test]
    fn test_deterministic() {
        let a = tag("Vengeance/Techno/Hats", "Closed_HiHat_03.wav");
        let b = tag("Vengeance/Techno/Hats", "Closed_HiHat_03.wav");
        assert_eq!(a, b);
        assert_eq!(a.tags, vec!["#Hat", "#Vengeance", "#Techno"]);
    }

    #[test]
    fn test_backslash_paths_tokenize() {
        assert_eq!(tokenize("A\\B_c-d e.wav"), vec!["A", "B", "c", "d", "e", "wav"]);
        let result = tag("Packs\\Splice\\Loops", "Drumloop.wav");
        assert_eq!(result.tags, vec!["#Splice"]);
    }

    #[test]
    fn test_hat_keyword_needs_word_start() {
        for (path, name) in [
            ("Synths", "Phat_Stab_01.wav"),
            ("Loops", "That_Groove.wav"),
            ("Leads", "Whatever_Lead.wav"),
        ] {
            let result = tag(path, name);
            assert_ne!(result.master_category, Some(Category::Hat), "{}/{}", path, name);
            assert!(!result.tags.contains(&"#Hat".to_string()), "{}/{}", path, name);
        }

        assert_eq!(tag("Synths", "Phat_Stab_01.wav").master_category, Some(Category::Synth));
        assert_eq!(tag("Leads", "Whatever_Lead.wav").master_category, Some(Category::Synth));
        assert!(!tag("Loops", "That_Groove.wav").is_locked);
    }

    #[test]
    fn test_hat_spellings() {
        for (path, name) in [
            ("Hats", "Closed01.wav"),
            ("Drums", "Hi-Hat_Open.wav"),
            ("Drums", "Hi_Hat_02.wav"),
            ("Drums", "OpenHat_909.wav"),
            ("Drums", "ClosedHat_909.wav"),
            ("", "Hat_03.wav"),
        ] {
            let result = tag(path, name);
            assert_eq!(result.master_category, Some(Category::Hat), "{}/{}", path, name);
            assert!(result.is_locked);
        }
    }

    #[test]
    fn test_format_tag() {
        assert_eq!(format_tag("Drum and Bass"), "#Drum_and_Bass");
        assert_eq!(format_tag("Techno"), "#Techno");
    }
}
