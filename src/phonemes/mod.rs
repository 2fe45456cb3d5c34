//! Phoneme sources.
//!
//! A [`PhonemeSource`] turns one written word into an ordered list of IPA
//! phoneme symbols. The transducer never calls a source directly; the engine
//! does, and converts any error into a per-word "unavailable" outcome.

pub mod cmu;
pub mod lexicon;

pub use cmu::CmuDictionary;
pub use lexicon::Lexicon;

use crate::core::types::Phoneme;
use crate::error::PhonemizeError;

/// Converts a word into phoneme symbols in pronunciation order.
pub trait PhonemeSource: Send + Sync {
    /// Phonemize a single word.
    ///
    /// # Arguments
    /// - `word`: One whitespace-free token as typed by the user.
    /// - `language_hint`: Language/dialect code such as `en-us`.
    fn phonemize(&self, word: &str, language_hint: &str) -> Result<Vec<Phoneme>, PhonemizeError>;

    /// Human-readable name of this source.
    fn name(&self) -> &'static str;
}

/// Tries each source in turn and returns the first success.
pub struct Chain {
    sources: Vec<Box<dyn PhonemeSource>>,
}

impl Chain {
    pub fn new() -> Self {
        Self { sources: Vec::new() }
    }

    pub fn push(mut self, source: impl PhonemeSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    pub fn push_boxed(&mut self, source: Box<dyn PhonemeSource>) {
        self.sources.push(source);
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }
}

impl Default for Chain {
    fn default() -> Self {
        Self::new()
    }
}

impl PhonemeSource for Chain {
    fn phonemize(&self, word: &str, language_hint: &str) -> Result<Vec<Phoneme>, PhonemizeError> {
        let mut last_err = PhonemizeError::UnknownWord {
            word: word.to_string(),
        };
        for source in &self.sources {
            match source.phonemize(word, language_hint) {
                Ok(phonemes) => return Ok(phonemes),
                Err(e) => {
                    tracing::trace!(source = source.name(), word, "Phoneme source miss: {e}");
                    last_err = e;
                }
            }
        }
        Err(last_err)
    }

    fn name(&self) -> &'static str {
        "Chain"
    }
}

/// Lowercases a word and strips leading/trailing punctuation. Returns `None`
/// if nothing alphanumeric remains.
pub(crate) fn clean_word(word: &str) -> Option<String> {
    let trimmed = word.trim_matches(|c: char| !c.is_alphanumeric());
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}
