//! CMU Pronouncing Dictionary phoneme source.
//!
//! Looks words up in `cmudict.dict` and converts the ARPABET pronunciation to
//! the IPA symbols the script profiles are keyed by. Stress digits are
//! dropped (unstressed `AH0` becomes `ə`); affricates come out tie-barred (`t͡ʃ`, `d͡ʒ`) and diphthongs as
//! two-character symbols (`aɪ`), which the transducer decomposes when a
//! profile has no entry for them.

use std::path::{Path, PathBuf};

use cmudict_fast::{Cmudict, Rule};

use super::{clean_word, PhonemeSource};
use crate::core::types::Phoneme;
use crate::error::PhonemizeError;

const SYSTEM_DICT: &str = "/usr/share/cmudict/cmudict.dict";

/// English phoneme source backed by the CMU dictionary.
pub struct CmuDictionary {
    cmudict: Cmudict,
}

impl CmuDictionary {
    /// Load the dictionary from `dict_path`.
    pub fn new(dict_path: impl AsRef<Path>) -> Result<Self, PhonemizeError> {
        let path = dict_path.as_ref().to_path_buf();
        let cmudict = Cmudict::new(&path).map_err(|e| PhonemizeError::DictionaryLoad {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        tracing::info!(path = %path.display(), "Loaded CMU dictionary");
        Ok(Self { cmudict })
    }

    /// Load from the first default location that exists:
    /// - `<data dir>/name-oracle/cmudict.dict`
    /// - `/usr/share/cmudict/cmudict.dict`
    pub fn from_default_location() -> Result<Self, PhonemizeError> {
        match default_locations().into_iter().find(|p| p.is_file()) {
            Some(path) => Self::new(path),
            None => Err(PhonemizeError::DictionaryNotFound),
        }
    }

    fn rule_to_ipa(rule: &Rule) -> Vec<Phoneme> {
        rule.pronunciation()
            .iter()
            .map(|symbol| symbol_to_ipa(&symbol.to_string()))
            .collect()
    }
}

/// One stress-marked ARPABET symbol to IPA. Unstressed `AH0` is a schwa;
/// every other symbol loses its stress digit before lookup.
fn symbol_to_ipa(arpabet: &str) -> Phoneme {
    if arpabet == "AH0" {
        return "ə".to_string();
    }
    let base = arpabet.trim_end_matches(|c: char| c.is_ascii_digit());
    match arpabet_to_ipa(base) {
        Some(ipa) => ipa.to_string(),
        None => base.to_lowercase(),
    }
}

impl PhonemeSource for CmuDictionary {
    fn phonemize(&self, word: &str, language_hint: &str) -> Result<Vec<Phoneme>, PhonemizeError> {
        if !language_hint.to_ascii_lowercase().starts_with("en") {
            return Err(PhonemizeError::UnsupportedLanguage {
                hint: language_hint.to_string(),
                source_name: self.name(),
            });
        }

        let key = clean_word(word).ok_or_else(|| PhonemizeError::Unpronounceable {
            word: word.to_string(),
        })?;

        // First listed pronunciation is the most common one.
        self.cmudict
            .get(&key)
            .and_then(|rules| rules.first())
            .map(Self::rule_to_ipa)
            .ok_or(PhonemizeError::UnknownWord { word: key })
    }

    fn name(&self) -> &'static str {
        "CmuDictionary"
    }
}

fn default_locations() -> Vec<PathBuf> {
    let mut locations = Vec::new();
    if let Some(data) = dirs::data_dir() {
        locations.push(data.join("name-oracle").join("cmudict.dict"));
    }
    locations.push(PathBuf::from(SYSTEM_DICT));
    locations
}

/// ARPABET (stress removed) to IPA.
fn arpabet_to_ipa(arpabet: &str) -> Option<&'static str> {
    let ipa = match arpabet {
        // Vowels
        "AA" => "ɑ", "AE" => "æ", "AH" => "ʌ", "AO" => "ɔ",
        "AW" => "aʊ", "AX" => "ə", "AXR" => "ɚ", "AY" => "aɪ",
        "EH" => "ɛ", "ER" => "ɝ", "EY" => "eɪ", "IH" => "ɪ",
        "IX" => "ɨ", "IY" => "i", "OW" => "oʊ", "OY" => "ɔɪ",
        "UH" => "ʊ", "UW" => "u", "UX" => "ʉ",
        // Consonants
        "B" => "b", "CH" => "t\u{361}ʃ", "D" => "d", "DH" => "ð",
        "DX" => "ɾ", "F" => "f", "G" => "ɡ", "HH" => "h",
        "JH" => "d\u{361}ʒ", "K" => "k", "L" => "l", "M" => "m",
        "N" => "n", "NG" => "ŋ", "P" => "p", "Q" => "ʔ",
        "R" => "ɹ", "S" => "s", "SH" => "ʃ", "T" => "t",
        "TH" => "θ", "V" => "v", "W" => "w", "Y" => "j",
        "Z" => "z", "ZH" => "ʒ",
        _ => return None,
    };
    Some(ipa)
}
