// src/core/types.rs
use crate::core::sonority;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Symbol standing in for a word that no resolution stage could transcribe.
pub const UNKNOWN_MARKER: &str = "UNK";

const STRESS_DIGITS: &[char] = &['0', '1', '2'];

/// Letters followed by an optional stress digit, e.g. `AH0`, `SH`.
static PHONEME_SYNTAX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]+[0-2]?$").expect("phoneme syntax pattern is valid"));

/// A single ARPAbet symbol, optionally carrying a stress digit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Phoneme(String);

impl Phoneme {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    pub fn unknown() -> Self {
        Self(UNKNOWN_MARKER.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The symbol with any trailing stress digits removed.
    pub fn base(&self) -> &str {
        self.0.trim_end_matches(STRESS_DIGITS)
    }

    pub fn stress(&self) -> Option<u8> {
        match self.0.chars().last() {
            Some(c @ '0'..='2') => Some(c as u8 - b'0'),
            _ => None,
        }
    }

    /// Syllable nuclei are exactly the stress-marked symbols.
    pub fn is_nucleus(&self) -> bool {
        self.stress().is_some()
    }

    pub fn is_vowel(&self) -> bool {
        sonority::is_vowel_base(self.base())
    }

    pub fn is_unknown(&self) -> bool {
        self.0 == UNKNOWN_MARKER
    }

    /// True when the symbol matches the phoneme syntax.
    pub fn is_well_formed(&self) -> bool {
        is_phoneme_syntax(&self.0)
    }
}

impl fmt::Display for Phoneme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Phoneme {
    fn from(symbol: &str) -> Self {
        Self::new(symbol)
    }
}

impl From<String> for Phoneme {
    fn from(symbol: String) -> Self {
        Self(symbol)
    }
}

/// Ordered phonemes of one word.
pub type PhonemeSequence = Vec<Phoneme>;

/// A non-empty slice of a word's phoneme sequence.
pub type Syllable = Vec<Phoneme>;

pub fn is_phoneme_syntax(symbol: &str) -> bool {
    PHONEME_SYNTAX.is_match(symbol)
}

/// The single-element sequence returned for unresolvable words.
pub fn unknown_sequence() -> PhonemeSequence {
    vec![Phoneme::unknown()]
}

pub fn is_unknown_sequence(phonemes: &[Phoneme]) -> bool {
    matches!(phonemes, [only] if only.is_unknown())
}

/// Splits a whitespace-separated transcription such as `"K AE1 T S"`.
pub fn parse_sequence(transcription: &str) -> PhonemeSequence {
    transcription.split_whitespace().map(Phoneme::from).collect()
}

/// Maps every phoneme to `V` or `C`, e.g. `CVCC` for `K AE1 T S`.
pub fn shape(syllable: &[Phoneme]) -> String {
    syllable
        .iter()
        .map(|p| if p.is_vowel() { 'V' } else { 'C' })
        .collect()
}

/// A syllable is open when it ends in a vowel.
pub fn is_open(syllable: &[Phoneme]) -> bool {
    syllable.last().map_or(false, Phoneme::is_vowel)
}

pub fn join_phonemes(phonemes: &[Phoneme], separator: &str) -> String {
    phonemes
        .iter()
        .map(Phoneme::as_str)
        .collect::<Vec<_>>()
        .join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_strips_stress_digit() {
        assert_eq!(Phoneme::from("AH0").base(), "AH");
        assert_eq!(Phoneme::from("SH").base(), "SH");
        assert_eq!(Phoneme::from("EY1").stress(), Some(1));
        assert_eq!(Phoneme::from("T").stress(), None);
    }

    #[test]
    fn vowel_class_ignores_stress() {
        assert!(Phoneme::from("IY2").is_vowel());
        assert!(Phoneme::from("IY").is_vowel());
        assert!(!Phoneme::from("NG").is_vowel());
        assert!(!Phoneme::unknown().is_vowel());
    }

    #[test]
    fn syntax_accepts_only_letters_and_optional_digit() {
        assert!(is_phoneme_syntax("AA1"));
        assert!(is_phoneme_syntax("ZH"));
        assert!(!is_phoneme_syntax("ah0"));
        assert!(!is_phoneme_syntax("AH3"));
        assert!(!is_phoneme_syntax(","));
        assert!(!is_phoneme_syntax(""));
    }

    #[test]
    fn shape_and_openness() {
        let cats = parse_sequence("K AE1 T S");
        assert_eq!(shape(&cats), "CVCC");
        assert!(!is_open(&cats));
        assert!(is_open(&parse_sequence("B IY1")));
        assert!(!is_open(&[]));
    }

    #[test]
    fn unknown_sequence_is_single_marker() {
        assert!(is_unknown_sequence(&unknown_sequence()));
        assert!(!is_unknown_sequence(&[Phoneme::unknown(), Phoneme::unknown()]));
        assert!(!is_unknown_sequence(&[]));
    }
}
