use crate::config::OracleConfig;
use crate::core::converter::GraphemeTransducer;
use crate::core::profiles::ProfileRegistry;
use crate::core::types::{Phoneme, ScriptProfile, UnavailableReason, WordOutcome};
use crate::error::{OracleResult, PhonemizeError};
use crate::interpret::{GoogleTranslate, Interpreter};
use crate::phonemes::{Chain, CmuDictionary, Lexicon, PhonemeSource};
use crate::scoring;

/// One word of a phrase and what became of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordReading {
    pub word: String,
    pub phonemes: Vec<Phoneme>,
    pub outcome: WordOutcome,
}

/// What the translation service made of the script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interpretation {
    Translated(String),
    /// The service failed; the transliteration is still valid.
    Failed(String),
    /// No interpreter configured, or nothing to interpret.
    Skipped,
}

/// The full oracle answer for one phrase.
#[derive(Debug, Clone)]
pub struct Reading {
    pub input: String,
    /// Lens actually used (after fallback).
    pub lens: String,
    pub script: String,
    pub words: Vec<WordReading>,
    pub interpretation: Interpretation,
    pub power: Option<u64>,
}

impl Reading {
    /// JSON shape shared by the CLI and the HTTP server.
    pub fn to_json(&self) -> serde_json::Value {
        let (interpretation, interpretation_error) = match &self.interpretation {
            Interpretation::Translated(text) => (Some(text.as_str()), None),
            Interpretation::Failed(message) => (None, Some(message.as_str())),
            Interpretation::Skipped => (None, None),
        };
        serde_json::json!({
            "input": self.input,
            "lens": self.lens,
            "script": self.script,
            "interpretation": interpretation,
            "interpretation_error": interpretation_error,
            "power": self.power,
            "words": words_to_json(&self.words),
        })
    }
}

pub fn words_to_json(words: &[WordReading]) -> serde_json::Value {
    words
        .iter()
        .map(|w| {
            let error = match &w.outcome {
                WordOutcome::Rendered(_) => None,
                WordOutcome::Unavailable(reason) => Some(reason.to_string()),
            };
            serde_json::json!({
                "word": w.word,
                "phonemes": w.phonemes,
                "glyphs": w.outcome.as_str(),
                "error": error,
            })
        })
        .collect()
}

/// Phrase-level entry point: registry + phoneme source + optional interpreter.
pub struct OracleEngine {
    registry: ProfileRegistry,
    phonemes: Box<dyn PhonemeSource>,
    interpreter: Option<Box<dyn Interpreter>>,
    language_hint: String,
}

impl OracleEngine {
    pub fn new(registry: ProfileRegistry, phonemes: impl PhonemeSource + 'static) -> Self {
        Self {
            registry,
            phonemes: Box::new(phonemes),
            interpreter: None,
            language_hint: "en-us".to_string(),
        }
    }

    pub fn with_interpreter(mut self, interpreter: impl Interpreter + 'static) -> Self {
        self.interpreter = Some(Box::new(interpreter));
        self
    }

    pub fn with_language_hint(mut self, hint: impl Into<String>) -> Self {
        self.language_hint = hint.into();
        self
    }

    /// Builds the engine a binary runs with: bundled profiles plus
    /// `profiles_dir`, a lexicon and/or the CMU dictionary, and Google
    /// Translate when an API key is present.
    pub fn from_config(config: &OracleConfig) -> OracleResult<Self> {
        let mut registry = ProfileRegistry::bundled()?;
        if let Some(dir) = &config.profiles_dir {
            registry = registry.with_directory(dir);
        }
        let registry = registry.with_default(&config.default_lens)?;

        let mut chain = Chain::new();
        if let Some(path) = &config.phonemizer.lexicon_path {
            chain.push_boxed(Box::new(Lexicon::load(path)?));
        }
        match &config.phonemizer.cmudict_path {
            Some(path) => chain.push_boxed(Box::new(CmuDictionary::new(path)?)),
            None => match CmuDictionary::from_default_location() {
                Ok(dict) => chain.push_boxed(Box::new(dict)),
                Err(e) if chain.is_empty() => return Err(e.into()),
                Err(e) => tracing::warn!("Continuing with the lexicon only: {e}"),
            },
        }

        let mut engine = Self::new(registry, chain).with_language_hint(&config.language_hint);
        match GoogleTranslate::from_env(&config.translate) {
            Ok(client) => engine = engine.with_interpreter(client),
            Err(e) => tracing::warn!("Interpretation disabled: {e}"),
        }

        tracing::info!(
            default_lens = %engine.registry.default_lens(),
            lenses = engine.lenses().len(),
            interpreter = engine.interpreter.as_ref().map(|i| i.name()).unwrap_or("none"),
            "Oracle engine ready"
        );
        Ok(engine)
    }

    pub fn registry(&self) -> &ProfileRegistry {
        &self.registry
    }

    pub fn resolve(&self, lens: &str) -> &ScriptProfile {
        self.registry.resolve(lens)
    }

    /// All loaded profiles, sorted by lens key.
    pub fn lenses(&self) -> Vec<&ScriptProfile> {
        self.registry.lenses()
    }

    pub fn has_interpreter(&self) -> bool {
        self.interpreter.is_some()
    }

    /// Phonemizes and transduces every word of `text`. A failure for one word
    /// only affects that word.
    pub fn transliterate_words(&self, text: &str, lens: &str) -> Vec<WordReading> {
        let transducer = GraphemeTransducer::new(self.registry.resolve(lens));

        text.split_whitespace()
            .map(|word| match self.phonemes.phonemize(word, &self.language_hint) {
                Ok(phonemes) => {
                    let outcome = transducer.transduce(&phonemes);
                    WordReading {
                        word: word.to_string(),
                        phonemes,
                        outcome,
                    }
                }
                Err(e) => self.unavailable(word, e),
            })
            .collect()
    }

    /// Transliterates a phrase, joining words with single spaces. Words that
    /// could not be transliterated appear as the sentinel.
    pub fn transliterate_phrase(&self, text: &str, lens: &str) -> String {
        join_words(&self.transliterate_words(text, lens))
    }

    /// Transliteration, interpretation and score for one phrase.
    pub fn read(&self, text: &str, lens: &str) -> Reading {
        let profile = self.registry.resolve(lens);
        let words = self.transliterate_words(text, &profile.lens);
        let script = join_words(&words);

        let interpretation = match &self.interpreter {
            Some(interpreter) if !script.is_empty() => {
                match interpreter.interpret(&script, &profile.translation_source) {
                    Ok(text) => Interpretation::Translated(text),
                    Err(e) => {
                        tracing::warn!(lens = %profile.lens, interpreter = interpreter.name(), "Interpretation failed: {e}");
                        Interpretation::Failed(e.to_string())
                    }
                }
            }
            _ => Interpretation::Skipped,
        };

        Reading {
            input: text.to_string(),
            lens: profile.lens.clone(),
            power: scoring::score(&script, profile),
            script,
            words,
            interpretation,
        }
    }

    fn unavailable(&self, word: &str, e: PhonemizeError) -> WordReading {
        tracing::warn!(word, source = self.phonemes.name(), "Phonemization failed: {e}");
        WordReading {
            word: word.to_string(),
            phonemes: Vec::new(),
            outcome: WordOutcome::Unavailable(UnavailableReason::Phonemizer(e.to_string())),
        }
    }
}

/// Joins word outcomes with single spaces; unavailable words become the
/// sentinel.
pub fn join_words(words: &[WordReading]) -> String {
    words
        .iter()
        .map(|w| w.outcome.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::UNAVAILABLE_SENTINEL;
    use crate::error::InterpretError;

    struct Echo;

    impl Interpreter for Echo {
        fn interpret(&self, text: &str, source_language: &str) -> Result<String, InterpretError> {
            Ok(format!("{source_language}:{}", text.chars().count()))
        }

        fn name(&self) -> &'static str {
            "Echo"
        }
    }

    fn engine() -> OracleEngine {
        let mut lexicon = Lexicon::new();
        lexicon.insert("sam", ["s", "a", "m"]);
        lexicon.insert("ab", ["a", "b"]);
        lexicon.insert("blank", Vec::<String>::new());
        OracleEngine::new(ProfileRegistry::bundled().unwrap(), lexicon)
    }

    #[test]
    fn phrase_words_join_with_single_space() {
        let engine = engine();
        assert_eq!(
            engine.transliterate_phrase("  sam \t ab  ", "hebrew"),
            "סָם אָבּ"
        );
    }

    #[test]
    fn joined_words_match_phrase() {
        let engine = engine();
        let words = engine.transliterate_words("sam zork ab", "hebrew");
        assert_eq!(
            join_words(&words),
            engine.transliterate_phrase("sam zork ab", "hebrew")
        );
        assert_eq!(join_words(&[]), "");
    }

    #[test]
    fn empty_phrase_is_empty() {
        let engine = engine();
        assert_eq!(engine.transliterate_phrase("", "hebrew"), "");
        assert_eq!(engine.transliterate_phrase("   ", "hebrew"), "");
    }

    #[test]
    fn failed_word_becomes_sentinel_in_place() {
        let engine = engine();
        let words = engine.transliterate_words("sam zork sam", "hebrew");
        assert_eq!(words.len(), 3);
        assert_eq!(words[1].outcome.as_str(), UNAVAILABLE_SENTINEL);
        assert!(matches!(
            words[1].outcome,
            WordOutcome::Unavailable(UnavailableReason::Phonemizer(_))
        ));
        assert_eq!(words[0].outcome, words[2].outcome);
    }

    #[test]
    fn word_without_phonemes_is_unavailable() {
        let engine = engine();
        let words = engine.transliterate_words("blank", "hebrew");
        assert_eq!(
            words[0].outcome,
            WordOutcome::Unavailable(UnavailableReason::NoPhonemes)
        );
    }

    #[test]
    fn read_without_interpreter_is_skipped() {
        let reading = engine().read("sam", "klingon");
        assert_eq!(reading.lens, "hebrew");
        assert_eq!(reading.interpretation, Interpretation::Skipped);
        assert_eq!(reading.power, Some(100));
    }

    #[test]
    fn read_passes_lens_language_code() {
        let engine = engine().with_interpreter(Echo);
        let reading = engine.read("sam", "arabic");
        assert_eq!(
            reading.interpretation,
            Interpretation::Translated(format!("ar:{}", reading.script.chars().count()))
        );
    }

    #[test]
    fn empty_phrase_is_not_sent_for_interpretation() {
        let engine = engine().with_interpreter(Echo);
        let reading = engine.read("", "hebrew");
        assert_eq!(reading.script, "");
        assert_eq!(reading.interpretation, Interpretation::Skipped);
    }

    #[test]
    fn reading_json_shape() {
        let reading = engine().read("sam zork", "hebrew");
        let json = reading.to_json();
        assert_eq!(json["script"], "סָם [?]");
        assert_eq!(json["interpretation"], serde_json::Value::Null);
        assert_eq!(json["words"][0]["phonemes"][2], "m");
        assert!(json["words"][1]["error"].is_string());
    }
}
