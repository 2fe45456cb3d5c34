// src/core/types.rs
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Rendered in place of a word whose transliteration is unavailable.
pub const UNAVAILABLE_SENTINEL: &str = "[?]";

/// An IPA-style sound unit, one or more characters (e.g. "p", "t͡ʃ", "oʊ").
pub type Phoneme = String;

/// Everything the transducer needs to know about one target script.
/// Loaded once into the registry and never mutated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct ScriptProfile {
    /// Registry key, lowercase (e.g. "hebrew").
    pub lens: String,
    /// Human-readable script name.
    pub name: String,
    /// Language code handed to the translation service.
    pub translation_source: String,
    /// Phoneme -> glyph(s).
    pub consonants: HashMap<String, String>,
    /// Phoneme -> vowel mark. An empty mark means the vowel is implicit.
    pub vowels: HashMap<String, String>,
    /// Glyph -> word-final letter form.
    pub final_forms: HashMap<char, char>,
    /// Carrier letter that hosts a vowel mark when no consonant precedes it.
    pub vowel_anchor: Option<String>,
    /// Glyphs which make a vowel mark behave like a consonant (r-colored vowels).
    pub consonantal_vowel_marks: Vec<String>,
    /// Syllabic scripts: every vowel leaves the cursor "after a consonant".
    pub vowels_close_syllable: bool,
    /// Glyph -> numeric value used by the scorer.
    pub letter_values: HashMap<char, u32>,
}

impl ScriptProfile {
    /// Whether a vowel mark leaves the transducer as if a consonant had just
    /// been written, so the next vowel needs no carrier.
    pub fn closes_syllable(&self, mark: &str) -> bool {
        self.vowels_close_syllable
            || self
                .consonantal_vowel_marks
                .iter()
                .any(|glyph| mark.contains(glyph.as_str()))
    }
}

/// Why a word could not be transliterated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnavailableReason {
    /// The phoneme source produced nothing for the word.
    NoPhonemes,
    /// A phoneme symbol was empty or contained whitespace/control characters.
    MalformedSymbol(String),
    /// The phoneme source failed for the word.
    Phonemizer(String),
}

impl fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoPhonemes => write!(f, "no phonemes"),
            Self::MalformedSymbol(symbol) => write!(f, "malformed phoneme symbol {symbol:?}"),
            Self::Phonemizer(message) => write!(f, "phonemizer: {message}"),
        }
    }
}

/// Result of transducing one word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordOutcome {
    Rendered(String),
    Unavailable(UnavailableReason),
}

impl WordOutcome {
    /// The glyphs for a rendered word, or the sentinel.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Rendered(glyphs) => glyphs,
            Self::Unavailable(_) => UNAVAILABLE_SENTINEL,
        }
    }

    pub fn is_rendered(&self) -> bool {
        matches!(self, Self::Rendered(_))
    }
}

impl fmt::Display for WordOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
