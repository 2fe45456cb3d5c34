//! Script profile registry.
//!
//! Profiles are TOML documents. Three are bundled into the binary (`hebrew`,
//! `arabic`, `indic`); a directory of extra `*.toml` files may be layered on
//! top at startup, replacing bundled lenses with the same key.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::core::types::ScriptProfile;
use crate::error::{ProfileError, ProfileResult};

pub const DEFAULT_LENS: &str = "hebrew";

const HEBREW_TOML: &str = include_str!("../../data/profiles/hebrew.toml");
const ARABIC_TOML: &str = include_str!("../../data/profiles/arabic.toml");
const INDIC_TOML: &str = include_str!("../../data/profiles/indic.toml");

// ── TOML deserialization helpers ─────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ProfileToml {
    profile: ProfileMeta,
    #[serde(default)]
    consonants: HashMap<String, String>,
    #[serde(default)]
    vowels: HashMap<String, String>,
    #[serde(default)]
    final_forms: HashMap<String, String>,
    #[serde(default)]
    letter_values: HashMap<String, u32>,
}

#[derive(Debug, Deserialize)]
struct ProfileMeta {
    lens: String,
    name: String,
    translation_source: String,
    #[serde(default)]
    vowel_anchor: Option<String>,
    #[serde(default)]
    consonantal_vowel_marks: Vec<String>,
    #[serde(default)]
    vowels_close_syllable: bool,
}

fn single_char(lens: &str, table: &'static str, glyph: &str) -> ProfileResult<char> {
    let mut chars = glyph.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(ProfileError::NotAGlyph {
            lens: lens.to_string(),
            table,
            glyph: glyph.to_string(),
        }),
    }
}

/// Parses and validates one profile document. `origin` names the document in
/// error messages.
pub fn parse_profile_toml(toml_str: &str, origin: &str) -> ProfileResult<ScriptProfile> {
    let parsed: ProfileToml = toml::from_str(toml_str).map_err(|e| ProfileError::Parse {
        origin: origin.to_string(),
        message: e.to_string(),
    })?;
    let lens = parsed.profile.lens.trim().to_lowercase();

    for (table, map) in [("consonants", &parsed.consonants), ("vowels", &parsed.vowels)] {
        if map.keys().any(|symbol| symbol.is_empty()) {
            return Err(ProfileError::EmptySymbol {
                lens: lens.clone(),
                table,
            });
        }
    }
    if let Some((symbol, _)) = parsed.consonants.iter().find(|(_, glyph)| glyph.is_empty()) {
        return Err(ProfileError::EmptyGlyph {
            lens: lens.clone(),
            symbol: symbol.clone(),
        });
    }

    if parsed.profile.consonantal_vowel_marks.iter().any(|glyph| glyph.is_empty()) {
        return Err(ProfileError::EmptyConsonantalMark { lens: lens.clone() });
    }

    let mut final_forms = HashMap::with_capacity(parsed.final_forms.len());
    for (plain, final_form) in &parsed.final_forms {
        final_forms.insert(
            single_char(&lens, "final_forms", plain)?,
            single_char(&lens, "final_forms", final_form)?,
        );
    }

    let mut letter_values = HashMap::with_capacity(parsed.letter_values.len());
    for (glyph, value) in &parsed.letter_values {
        letter_values.insert(single_char(&lens, "letter_values", glyph)?, *value);
    }

    let vowel_anchor = parsed.profile.vowel_anchor.filter(|anchor| !anchor.is_empty());

    Ok(ScriptProfile {
        lens,
        name: parsed.profile.name,
        translation_source: parsed.profile.translation_source,
        consonants: parsed.consonants,
        vowels: parsed.vowels,
        final_forms,
        vowel_anchor,
        consonantal_vowel_marks: parsed.profile.consonantal_vowel_marks,
        vowels_close_syllable: parsed.profile.vowels_close_syllable,
        letter_values,
    })
}

fn bundled_profiles() -> ProfileResult<Vec<ScriptProfile>> {
    [
        (HEBREW_TOML, "bundled:hebrew"),
        (ARABIC_TOML, "bundled:arabic"),
        (INDIC_TOML, "bundled:indic"),
    ]
    .iter()
    .map(|(toml, origin)| parse_profile_toml(toml, origin))
    .collect()
}

// ── Registry ─────────────────────────────────────────────────────────────

/// Read-only lens -> profile table with a guaranteed default entry.
#[derive(Debug, Clone)]
pub struct ProfileRegistry {
    profiles: Vec<ScriptProfile>,
    index: HashMap<String, usize>,
    default: usize,
}

impl ProfileRegistry {
    /// Builds a registry from explicit profiles. Later profiles replace earlier
    /// ones with the same lens key.
    pub fn new(profiles: Vec<ScriptProfile>, default_lens: &str) -> ProfileResult<Self> {
        let mut registry = Self {
            profiles: Vec::with_capacity(profiles.len()),
            index: HashMap::new(),
            default: 0,
        };
        for profile in profiles {
            registry.insert(profile);
        }
        registry.set_default(default_lens)?;
        Ok(registry)
    }

    /// The three bundled lenses, defaulting to `hebrew`.
    pub fn bundled() -> ProfileResult<Self> {
        Self::new(bundled_profiles()?, DEFAULT_LENS)
    }

    /// Layers every `*.toml` profile found in `dir` over the current set.
    /// Unreadable or invalid files are skipped with a warning.
    pub fn with_directory(mut self, dir: &Path) -> Self {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(path = %dir.display(), "Failed to read profiles directory: {e}");
                return self;
            }
        };

        let mut paths: Vec<_> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "toml"))
            .collect();
        paths.sort();

        for path in paths {
            match load_profile_file(&path) {
                Ok(profile) => {
                    tracing::info!(lens = %profile.lens, path = %path.display(), "Loaded script profile");
                    self.insert(profile);
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), "Skipping script profile: {e}");
                }
            }
        }
        self
    }

    /// Changes the fallback lens.
    pub fn with_default(mut self, lens: &str) -> ProfileResult<Self> {
        self.set_default(lens)?;
        Ok(self)
    }

    /// Looks up a lens, falling back to the default for unknown or empty keys.
    pub fn resolve(&self, lens: &str) -> &ScriptProfile {
        match self.get(lens) {
            Some(profile) => profile,
            None => {
                tracing::debug!(lens, fallback = %self.default_lens(), "Unknown lens, using default");
                &self.profiles[self.default]
            }
        }
    }

    /// Exact (case-insensitive) lookup without fallback.
    pub fn get(&self, lens: &str) -> Option<&ScriptProfile> {
        self.index
            .get(&normalize_lens(lens))
            .map(|&idx| &self.profiles[idx])
    }

    pub fn default_lens(&self) -> &str {
        &self.profiles[self.default].lens
    }

    /// All registered profiles, sorted by lens key.
    pub fn lenses(&self) -> Vec<&ScriptProfile> {
        let mut all: Vec<&ScriptProfile> = self.profiles.iter().collect();
        all.sort_by(|a, b| a.lens.cmp(&b.lens));
        all
    }

    fn insert(&mut self, profile: ScriptProfile) {
        match self.index.get(&profile.lens) {
            Some(&idx) => self.profiles[idx] = profile,
            None => {
                self.index.insert(profile.lens.clone(), self.profiles.len());
                self.profiles.push(profile);
            }
        }
    }

    fn set_default(&mut self, lens: &str) -> ProfileResult<()> {
        self.default = *self
            .index
            .get(&normalize_lens(lens))
            .ok_or_else(|| ProfileError::MissingDefault {
                lens: lens.to_string(),
            })?;
        Ok(())
    }
}

fn normalize_lens(lens: &str) -> String {
    lens.trim().to_lowercase()
}

fn load_profile_file(path: &Path) -> ProfileResult<ScriptProfile> {
    let content = std::fs::read_to_string(path).map_err(|e| ProfileError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_profile_toml(&content, &path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TINY: &str = r#"
        [profile]
        lens = "Tiny"
        name = "Tiny"
        translation_source = "xx"

        [consonants]
        "m" = "M"
    "#;

    #[test]
    fn bundled_has_three_lenses() {
        let registry = ProfileRegistry::bundled().unwrap();
        let lenses: Vec<&str> = registry.lenses().iter().map(|p| p.lens.as_str()).collect();
        assert_eq!(lenses, vec!["arabic", "hebrew", "indic"]);
        assert_eq!(registry.default_lens(), "hebrew");
    }

    #[test]
    fn bundled_translation_codes() {
        let registry = ProfileRegistry::bundled().unwrap();
        assert_eq!(registry.resolve("hebrew").translation_source, "he");
        assert_eq!(registry.resolve("arabic").translation_source, "ar");
        assert_eq!(registry.resolve("indic").translation_source, "hi");
    }

    #[test]
    fn unknown_lens_falls_back_to_default_every_time() {
        let registry = ProfileRegistry::bundled().unwrap();
        for _ in 0..3 {
            assert_eq!(registry.resolve("klingon").lens, "hebrew");
        }
        assert_eq!(registry.resolve("").lens, "hebrew");
        assert!(registry.get("klingon").is_none());
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let registry = ProfileRegistry::bundled().unwrap();
        assert_eq!(registry.resolve("  Arabic ").lens, "arabic");
        assert_eq!(registry.resolve("INDIC").lens, "indic");
    }

    #[test]
    fn indic_has_no_anchor_and_closes_syllables() {
        let registry = ProfileRegistry::bundled().unwrap();
        let indic = registry.resolve("indic");
        assert!(indic.vowel_anchor.is_none());
        assert!(indic.vowels_close_syllable);
        assert!(indic.final_forms.is_empty());
    }

    #[test]
    fn profile_serializes_with_glyph_keys() {
        let registry = ProfileRegistry::bundled().unwrap();
        let json = serde_json::to_value(registry.resolve("hebrew")).unwrap();
        assert_eq!(json["lens"], "hebrew");
        assert_eq!(json["final_forms"]["\u{05DE}"], "\u{05DD}");
        assert_eq!(json["letter_values"]["\u{05DE}"], 40);
    }

    #[test]
    fn lens_key_is_normalized() {
        let profile = parse_profile_toml(TINY, "test").unwrap();
        assert_eq!(profile.lens, "tiny");
        assert!(profile.vowel_anchor.is_none());
        assert!(profile.vowels.is_empty());
    }

    #[test]
    fn multi_char_final_form_rejected() {
        let doc = format!("{TINY}\n[final_forms]\n\"MN\" = \"m\"\n");
        let err = parse_profile_toml(&doc, "test").unwrap_err();
        assert!(matches!(err, ProfileError::NotAGlyph { table: "final_forms", .. }));
    }

    #[test]
    fn empty_consonantal_vowel_mark_rejected() {
        let doc = TINY.replace(
            "translation_source = \"xx\"",
            "translation_source = \"xx\"\nconsonantal_vowel_marks = [\"\"]",
        );
        let err = parse_profile_toml(&doc, "test").unwrap_err();
        assert!(matches!(err, ProfileError::EmptyConsonantalMark { .. }));
    }

    #[test]
    fn empty_consonant_glyph_rejected() {
        let doc = TINY.replace("\"M\"", "\"\"");
        let err = parse_profile_toml(&doc, "test").unwrap_err();
        assert!(matches!(err, ProfileError::EmptyGlyph { .. }));
    }

    #[test]
    fn malformed_toml_reports_origin() {
        let err = parse_profile_toml("[profile", "broken.toml").unwrap_err();
        match err {
            ProfileError::Parse { origin, .. } => assert_eq!(origin, "broken.toml"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_default_is_an_error() {
        let profile = parse_profile_toml(TINY, "test").unwrap();
        let err = ProfileRegistry::new(vec![profile], "hebrew").unwrap_err();
        assert!(matches!(err, ProfileError::MissingDefault { .. }));
    }

    #[test]
    fn directory_profiles_layer_over_bundled() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("tiny.toml"), TINY).unwrap();
        std::fs::write(
            dir.path().join("hebrew.toml"),
            TINY.replace("\"Tiny\"", "\"hebrew\""),
        )
        .unwrap();
        std::fs::write(dir.path().join("broken.toml"), "[profile").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let registry = ProfileRegistry::bundled()
            .unwrap()
            .with_directory(dir.path());

        assert_eq!(registry.lenses().len(), 4);
        assert_eq!(registry.resolve("tiny").consonants["m"], "M");
        // Replaced in place, still the default.
        assert_eq!(registry.resolve("nope").consonants["m"], "M");
    }

    #[test]
    fn with_default_switches_fallback() {
        let registry = ProfileRegistry::bundled()
            .unwrap()
            .with_default("Arabic")
            .unwrap();
        assert_eq!(registry.resolve("unknown").lens, "arabic");
    }
}
