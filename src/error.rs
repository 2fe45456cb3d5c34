//! Diagnostic error types for the oracle.
//!
//! The transducer itself never fails; these types cover the parts that touch
//! the outside world: profile data, phoneme lookup, the translation service
//! and configuration files.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type.
#[derive(Debug, Error, Diagnostic)]
pub enum OracleError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Profile(#[from] ProfileError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Phonemize(#[from] PhonemizeError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Interpret(#[from] InterpretError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

pub type OracleResult<T> = std::result::Result<T, OracleError>;

// ---------------------------------------------------------------------------
// Profile errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ProfileError {
    #[error("failed to parse script profile from {origin}: {message}")]
    #[diagnostic(
        code(oracle::profile::parse),
        help("Check the profile TOML syntax. A profile needs a [profile] table with lens, name and translation_source.")
    )]
    Parse { origin: String, message: String },

    #[error("failed to read script profile: {path}")]
    #[diagnostic(code(oracle::profile::io), help("Ensure the file exists and is readable."))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("lens \"{lens}\" has an empty phoneme key in its {table} table")]
    #[diagnostic(
        code(oracle::profile::empty_symbol),
        help("Every key in [consonants] and [vowels] must be a non-empty IPA symbol.")
    )]
    EmptySymbol { lens: String, table: &'static str },

    #[error("lens \"{lens}\" maps consonant \"{symbol}\" to an empty glyph")]
    #[diagnostic(
        code(oracle::profile::empty_glyph),
        help("Consonants must produce at least one character. Only vowel marks may be empty.")
    )]
    EmptyGlyph { lens: String, symbol: String },

    #[error("lens \"{lens}\" lists an empty glyph in consonantal_vowel_marks")]
    #[diagnostic(
        code(oracle::profile::empty_vowel_mark),
        help("Every entry must be a glyph such as \"ר\"; an empty entry would match every vowel mark.")
    )]
    EmptyConsonantalMark { lens: String },

    #[error("lens \"{lens}\" has a {table} entry \"{glyph}\" that is not a single character")]
    #[diagnostic(
        code(oracle::profile::not_a_glyph),
        help("Final forms and letter values are keyed by single characters, e.g. \"מ\" = \"ם\".")
    )]
    NotAGlyph {
        lens: String,
        table: &'static str,
        glyph: String,
    },

    #[error("default lens \"{lens}\" is not registered")]
    #[diagnostic(
        code(oracle::profile::missing_default),
        help("Set default_lens in the config to one of the bundled lenses: hebrew, arabic, indic.")
    )]
    MissingDefault { lens: String },
}

pub type ProfileResult<T> = std::result::Result<T, ProfileError>;

// ---------------------------------------------------------------------------
// Phonemizer errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum PhonemizeError {
    #[error("failed to load CMU dictionary from {path}: {message}")]
    #[diagnostic(
        code(oracle::phonemes::dictionary_load),
        help("The file must be in cmudict.dict format (one `word  PH1 PH2 ...` entry per line).")
    )]
    DictionaryLoad { path: String, message: String },

    #[error("CMU dictionary not found")]
    #[diagnostic(
        code(oracle::phonemes::dictionary_missing),
        help(
            "Download cmudict.dict to ~/.local/share/name-oracle/cmudict.dict, \
             pass --cmudict <path>, or set phonemizer.cmudict_path in the config."
        )
    )]
    DictionaryNotFound,

    #[error("no pronunciation known for \"{word}\"")]
    #[diagnostic(
        code(oracle::phonemes::unknown_word),
        help("Add the word to a lexicon file (phonemizer.lexicon_path) to give it a pronunciation.")
    )]
    UnknownWord { word: String },

    #[error("\"{word}\" contains nothing pronounceable")]
    #[diagnostic(code(oracle::phonemes::unpronounceable))]
    Unpronounceable { word: String },

    #[error("language \"{hint}\" is not supported by the {source_name} phonemizer")]
    #[diagnostic(
        code(oracle::phonemes::unsupported_language),
        help("The CMU dictionary only covers English; use an `en-*` language hint.")
    )]
    UnsupportedLanguage {
        hint: String,
        source_name: &'static str,
    },

    #[error("failed to read lexicon: {path}")]
    #[diagnostic(code(oracle::phonemes::lexicon_io), help("Ensure the file exists and is readable."))]
    LexiconIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse lexicon {path}: {message}")]
    #[diagnostic(
        code(oracle::phonemes::lexicon_parse),
        help("A lexicon is a TOML file with a [words] table, e.g. sam = [\"s\", \"a\", \"m\"].")
    )]
    LexiconParse { path: String, message: String },
}

// ---------------------------------------------------------------------------
// Interpretation errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum InterpretError {
    #[error("translation API key not set (${env})")]
    #[diagnostic(
        code(oracle::interpret::missing_key),
        help("Export a Google Cloud Translation API key in ${env}, or change translate.api_key_env.")
    )]
    MissingApiKey { env: String },

    #[error("translation request failed: {message}")]
    #[diagnostic(
        code(oracle::interpret::request),
        help("Check network connectivity and the translate.endpoint setting.")
    )]
    Request { message: String },

    #[error("translation service returned status {status}: {body}")]
    #[diagnostic(code(oracle::interpret::status))]
    Status { status: u16, body: String },

    #[error("unreadable translation response: {message}")]
    #[diagnostic(code(oracle::interpret::parse))]
    Parse { message: String },

    #[error("translation response contained no text")]
    #[diagnostic(code(oracle::interpret::empty))]
    EmptyResponse,
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config: {path}")]
    #[diagnostic(code(oracle::config::read), help("Ensure the file exists and is readable."))]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {message}")]
    #[diagnostic(
        code(oracle::config::parse),
        help("Write a fresh default with `name-oracle init-config --force`.")
    )]
    Parse { path: String, message: String },

    #[error("failed to write config: {path}")]
    #[diagnostic(
        code(oracle::config::write),
        help("Check that the parent directory is writable.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("config already exists: {path}")]
    #[diagnostic(code(oracle::config::exists), help("Pass --force to overwrite it."))]
    AlreadyExists { path: String },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
