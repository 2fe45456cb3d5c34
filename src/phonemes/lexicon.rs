//! In-memory pronunciation table.
//!
//! Covers names the CMU dictionary lacks, and gives tests a deterministic
//! phoneme source. On disk it is a TOML file:
//!
//! ```toml
//! [words]
//! sam = ["s", "a", "m"]
//! aleph = ["a", "l", "ɛ", "f"]
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use super::{clean_word, PhonemeSource};
use crate::core::types::Phoneme;
use crate::error::PhonemizeError;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Lexicon {
    #[serde(default)]
    words: HashMap<String, Vec<Phoneme>>,
}

impl Lexicon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a word. Keys are stored lowercase.
    pub fn insert<I, P>(&mut self, word: &str, phonemes: I)
    where
        I: IntoIterator<Item = P>,
        P: Into<Phoneme>,
    {
        self.words.insert(
            word.to_lowercase(),
            phonemes.into_iter().map(Into::into).collect(),
        );
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Parses a lexicon document. `origin` names it in error messages.
    pub fn from_toml_str(toml_str: &str, origin: &str) -> Result<Self, PhonemizeError> {
        let parsed: Lexicon = toml::from_str(toml_str).map_err(|e| PhonemizeError::LexiconParse {
            path: origin.to_string(),
            message: e.to_string(),
        })?;
        // Normalize keys so lookups are case-insensitive.
        Ok(Self {
            words: parsed
                .words
                .into_iter()
                .map(|(word, phonemes)| (word.to_lowercase(), phonemes))
                .collect(),
        })
    }

    pub fn load(path: &Path) -> Result<Self, PhonemizeError> {
        let content = std::fs::read_to_string(path).map_err(|e| PhonemizeError::LexiconIo {
            path: path.display().to_string(),
            source: e,
        })?;
        let lexicon = Self::from_toml_str(&content, &path.display().to_string())?;
        if lexicon.is_empty() {
            tracing::warn!(path = %path.display(), "Lexicon has no [words] entries");
        } else {
            tracing::info!(path = %path.display(), words = lexicon.len(), "Loaded lexicon");
        }
        Ok(lexicon)
    }
}

impl PhonemeSource for Lexicon {
    fn phonemize(&self, word: &str, _language_hint: &str) -> Result<Vec<Phoneme>, PhonemizeError> {
        let key = clean_word(word).ok_or_else(|| PhonemizeError::Unpronounceable {
            word: word.to_string(),
        })?;
        self.words
            .get(&key)
            .cloned()
            .ok_or(PhonemizeError::UnknownWord { word: key })
    }

    fn name(&self) -> &'static str {
        "Lexicon"
    }
}
