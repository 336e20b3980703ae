//! Category, brand and genre keyword dictionaries
//!
//! Category keywords are matched as substrings of the upper-cased path, so
//! they must be specific enough not to fire inside unrelated words. The path
//! searched always starts with `/`, so a keyword may begin with a separator
//! to anchor it to the start of a word. Brand and genre keys are matched
//! against whole path tokens.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::is_separator;
use crate::analysis::result::Category;
use crate::error::AnalysisError;

/// Path keyword mapped to a category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    /// Upper-case substring searched for in the path
    pub keyword: String,

    /// Category the keyword asserts
    pub category: Category,

    /// Override the category's default locking behaviour
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
}

impl CategoryRule {
    /// Rule using the category's default locking
    pub fn new(keyword: &str, category: Category) -> Self {
        Self {
            keyword: keyword.to_string(),
            category,
            locked: None,
        }
    }

    /// Whether a match of this rule locks the category
    pub fn locks(&self) -> bool {
        self.locked.unwrap_or_else(|| self.category.locks_by_default())
    }
}

/// Keyword dictionaries used by [`tag_from_path`](super::tag_from_path)
///
/// Category rules are tried in order; the first match becomes the master
/// category. Brand and genre maps go from an upper-case token to the display
/// name used for the tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagDictionary {
    /// Category rules in priority order
    pub categories: Vec<CategoryRule>,

    /// Sample-pack vendors
    pub brands: BTreeMap<String, String>,

    /// Genre aliases
    pub genres: BTreeMap<String, String>,
}

const DEFAULT_CATEGORIES: &[(&str, Category)] = &[
    ("KICK", Category::Kick),
    ("BASS", Category::Bass),
    ("SNARE", Category::Snare),
    ("CLAP", Category::Clap),
    ("HIHAT", Category::Hat),
    ("OPENHAT", Category::Hat),
    ("CLOSEDHAT", Category::Hat),
    // "HAT" only where a word starts, never inside THAT or PHAT
    ("/HAT", Category::Hat),
    ("_HAT", Category::Hat),
    ("-HAT", Category::Hat),
    ("CYMBAL", Category::Cymbal),
    ("CRASH", Category::Cymbal),
    ("PERC", Category::Percussion),
    ("SHAKER", Category::Percussion),
    ("VOCAL", Category::Vocal),
    ("VOX", Category::Vocal),
    ("ATMOS", Category::Atmos),
    ("PAD", Category::Atmos),
    ("SYNTH", Category::Synth),
    ("LEAD", Category::Synth),
    ("FX", Category::Fx),
    ("RISER", Category::Fx),
    ("IMPACT", Category::Fx),
];

const DEFAULT_BRANDS: &[(&str, &str)] = &[
    ("SPLICE", "Splice"),
    ("LOOPMASTERS", "Loopmasters"),
    ("SAMPLEMAGIC", "Sample Magic"),
    ("VENGEANCE", "Vengeance"),
    ("CYMATICS", "Cymatics"),
    ("KSHMR", "KSHMR"),
    ("BLACKOCTOPUS", "Black Octopus"),
    ("GHOSTHACK", "Ghosthack"),
    ("ZENHISER", "Zenhiser"),
    ("NI", "Native Instruments"),
];

const DEFAULT_GENRES: &[(&str, &str)] = &[
    ("TECHNO", "Techno"),
    ("HOUSE", "House"),
    ("DEEPHOUSE", "Deep House"),
    ("TECHHOUSE", "Tech House"),
    ("DNB", "Drum and Bass"),
    ("DUBSTEP", "Dubstep"),
    ("TRAP", "Trap"),
    ("HIPHOP", "Hip Hop"),
    ("LOFI", "Lo-Fi"),
    ("AMBIENT", "Ambient"),
    ("TRANCE", "Trance"),
    ("GARAGE", "UK Garage"),
    ("PHONK", "Phonk"),
];

impl Default for TagDictionary {
    fn default() -> Self {
        let owned = |pairs: &[(&str, &str)]| {
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>()
        };
        Self {
            categories: DEFAULT_CATEGORIES
                .iter()
                .map(|&(keyword, category)| CategoryRule::new(keyword, category))
                .collect(),
            brands: owned(DEFAULT_BRANDS),
            genres: owned(DEFAULT_GENRES),
        }
    }
}

impl TagDictionary {
    /// Dictionary with no keywords: every path is untagged
    pub fn empty() -> Self {
        Self {
            categories: Vec::new(),
            brands: BTreeMap::new(),
            genres: BTreeMap::new(),
        }
    }

    /// Parse a JSON dictionary, upper-case its keys and validate it
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidConfig` on malformed JSON or when
    /// [`validate`](Self::validate) rejects a keyword.
    pub fn from_json_str(json: &str) -> Result<Self, AnalysisError> {
        let dictionary: TagDictionary = serde_json::from_str(json)?;
        let dictionary = dictionary.normalized();
        dictionary.validate()?;
        Ok(dictionary)
    }

    /// Copy with every keyword and token key upper-cased
    pub fn normalized(self) -> Self {
        let upper = |map: BTreeMap<String, String>| {
            map.into_iter()
                .map(|(k, v)| (k.trim().to_uppercase(), v))
                .collect::<BTreeMap<_, _>>()
        };
        Self {
            categories: self
                .categories
                .into_iter()
                .map(|rule| CategoryRule {
                    keyword: rule.keyword.trim().to_uppercase(),
                    ..rule
                })
                .collect(),
            brands: upper(self.brands),
            genres: upper(self.genres),
        }
    }

    /// Reject keywords that can never match or would match everything
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidConfig` for an empty or lower-case
    /// keyword, a token key containing a path separator, or an empty display name.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        for rule in &self.categories {
            if rule.keyword.is_empty() {
                return Err(AnalysisError::InvalidConfig(format!(
                    "empty keyword for category {}",
                    rule.category
                )));
            }
            if rule.keyword != rule.keyword.to_uppercase() {
                return Err(AnalysisError::InvalidConfig(format!(
                    "category keyword {:?} must be upper case",
                    rule.keyword
                )));
            }
        }

        for (kind, map) in [("brand", &self.brands), ("genre", &self.genres)] {
            for (key, display) in map {
                if key.is_empty() || key.chars().any(is_separator) {
                    return Err(AnalysisError::InvalidConfig(format!(
                        "{} key {:?} must be a single non-empty token",
                        kind, key
                    )));
                }
                if key != &key.to_uppercase() {
                    return Err(AnalysisError::InvalidConfig(format!(
                        "{} key {:?} must be upper case",
                        kind, key
                    )));
                }
                if display.trim().is_empty() {
                    return Err(AnalysisError::InvalidConfig(format!(
                        "{} key {:?} has an empty display name",
                        kind, key
                    )));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_dictionary_is_valid() {
        let dictionary = TagDictionary::default();
        assert!(dictionary.validate().is_ok());
        assert_eq!(dictionary.categories[0].keyword, "KICK");
        assert!(dictionary.categories[0].locks());
    }

    #[test]
    fn test_json_keys_are_upper_cased() {
        let dictionary = TagDictionary::from_json_str(
            r#"{
                "categories": [{ "keyword": "tom", "category": "Percussion", "locked": true }],
                "brands": { "mypack": "My Pack" }
            }"#,
        )
        .unwrap();
        assert_eq!(dictionary.categories[0].keyword, "TOM");
        assert!(dictionary.categories[0].locks());
        assert_eq!(dictionary.brands.get("MYPACK").map(String::as_str), Some("My Pack"));
        assert!(dictionary.genres.contains_key("TECHNO"), "missing sections keep defaults");
    }

    #[test]
    fn test_default_dictionary_is_already_normalized() {
        let dictionary = TagDictionary::default();
        assert_eq!(dictionary.clone().normalized(), dictionary);
    }

    #[test]
    fn test_separator_in_token_rejected() {
        let result = TagDictionary::from_json_str(r#"{ "genres": { "DEEP HOUSE": "Deep House" } }"#);
        assert!(matches!(result, Err(AnalysisError::InvalidConfig(_))));
    }

    #[test]
    fn test_empty_keyword_rejected() {
        let result = TagDictionary::from_json_str(
            r#"{ "categories": [{ "keyword": "  ", "category": "Kick" }] }"#,
        );
        assert!(matches!(result, Err(AnalysisError::InvalidConfig(_))));
    }

    #[test]
    fn test_unlocked_override() {
        let rule = CategoryRule {
            locked: Some(false),
            ..CategoryRule::new("KICK", Category::Kick)
        };
        assert!(!rule.locks());
        assert!(!CategoryRule::new("PAD", Category::Atmos).locks());
    }
}
