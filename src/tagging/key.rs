//! Musical key parsing from file names
//!
//! Recognizes a standalone name token made of a note letter, an optional
//! sharp or flat, and an optional major/minor suffix: `C`, `A#m`, `Bbmin`,
//! `F♯`, `Gmaj`. Flats are stored as their enharmonic sharps. A lower-case
//! letter only counts with a quality suffix (`am`, `f#m`).

use std::sync::OnceLock;

use regex::Regex;

use super::tokenize;
use crate::analysis::result::Key;

fn key_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^([A-Ga-g])(#|b|♯|♭)?((?i:maj|major|min|minor)|m|M)?$").ok())
        .as_ref()
}

/// Parse the first key-like token of a file name
///
/// # Example
///
/// ```
/// use sample_dna::Key;
/// use sample_dna::tagging::key::parse_musical_key;
///
/// assert_eq!(parse_musical_key("Bass_F#m_120.wav"), Some(Key::Minor(6)));
/// assert_eq!(parse_musical_key("Pad Eb.wav"), Some(Key::Major(3)));
/// assert_eq!(parse_musical_key("Deep_Kick_01.wav"), None);
/// ```
pub fn parse_musical_key(name: &str) -> Option<Key> {
    let pattern = key_pattern()?;

    tokenize(name).into_iter().find_map(|token| {
        let caps = pattern.captures(token)?;
        let letter = caps.get(1)?.as_str().chars().next()?;
        let accidental = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        let quality = caps.get(3).map(|m| m.as_str()).unwrap_or("");

        // Lone lower-case letters are take/variant suffixes (`Kick_b`)
        if letter.is_ascii_lowercase() && quality.is_empty() {
            return None;
        }

        let natural: i32 = match letter.to_ascii_uppercase() {
            'C' => 0,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            _ => 11,
        };
        let shift = match accidental {
            "#" | "♯" => 1,
            "b" | "♭" => -1,
            _ => 0,
        };
        let pitch_class = (natural + shift).rem_euclid(12) as u32;

        let minor = quality == "m" || quality.to_ascii_lowercase().starts_with("min");
        Some(if minor {
            Key::Minor(pitch_class)
        } else {
            Key::Major(pitch_class)
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_and_minor_keys() {
        assert_eq!(parse_musical_key("Lead_C_128.wav"), Some(Key::Major(0)));
        assert_eq!(parse_musical_key("Lead_Am_128.wav"), Some(Key::Minor(9)));
        assert_eq!(parse_musical_key("Lead_AM_128.wav"), Some(Key::Major(9)));
        assert_eq!(parse_musical_key("Chord-Gmaj.wav"), Some(Key::Major(7)));
        assert_eq!(parse_musical_key("Chord-Dminor.wav"), Some(Key::Minor(2)));
        assert_eq!(parse_musical_key("Chord-DMIN.wav"), Some(Key::Minor(2)));
    }

    #[test]
    fn test_accidentals() {
        assert_eq!(parse_musical_key("Bass C#m.wav"), Some(Key::Minor(1)));
        assert_eq!(parse_musical_key("Bass Bbmin.wav"), Some(Key::Minor(10)));
        assert_eq!(parse_musical_key("Bass Cb.wav"), Some(Key::Major(11)));
        assert_eq!(parse_musical_key("Bass F♯.wav"), Some(Key::Major(6)));
        assert_eq!(parse_musical_key("Bass E♭m.wav"), Some(Key::Minor(3)));
    }

    #[test]
    fn test_words_are_not_keys() {
        assert_eq!(parse_musical_key("Deep_Kick_01.wav"), None);
        assert_eq!(parse_musical_key("Bad_Ambience.wav"), None);
        assert_eq!(parse_musical_key("Gm7_Stab.wav"), None);
        assert_eq!(parse_musical_key(""), None);
    }

    #[test]
    fn test_lower_case_needs_quality() {
        assert_eq!(parse_musical_key("Kick_b.wav"), None);
        assert_eq!(parse_musical_key("Snare_c.wav"), None);
        assert_eq!(parse_musical_key("Snare_c#.wav"), None);
        assert_eq!(parse_musical_key("Pad_am.wav"), Some(Key::Minor(9)));
        assert_eq!(parse_musical_key("Bass_f#m.wav"), Some(Key::Minor(6)));
        assert_eq!(parse_musical_key("Kick_b_Am.wav"), Some(Key::Minor(9)));
    }

    #[test]
    fn test_first_key_token_wins() {
        assert_eq!(parse_musical_key("Loop_Dm_to_F.wav"), Some(Key::Minor(2)));
    }
}
