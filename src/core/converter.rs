// src/core/converter.rs
use crate::core::types::{ScriptProfile, UnavailableReason, WordOutcome};

/// Per-word state. Lives only for the duration of one `transduce` call.
#[derive(Default)]
struct TransducerState {
    glyphs: String,
    last_was_consonant: bool,
}

/// A phoneme-to-glyph transducer driven entirely by a `ScriptProfile`.
///
/// One left-to-right pass, no lookahead: each phoneme is matched against the
/// consonant table, then the vowel table, then (for multi-character symbols)
/// split into its characters. Unmatched symbols are dropped. A final pass
/// swaps the rightmost eligible glyph for its word-final form.
pub struct GraphemeTransducer<'p> {
    profile: &'p ScriptProfile,
}

impl<'p> GraphemeTransducer<'p> {
    pub fn new(profile: &'p ScriptProfile) -> Self {
        Self { profile }
    }

    /// Transliterates one word's phonemes.
    pub fn transduce<S: AsRef<str>>(&self, phonemes: &[S]) -> WordOutcome {
        if phonemes.is_empty() {
            return WordOutcome::Unavailable(UnavailableReason::NoPhonemes);
        }

        let mut state = TransducerState::default();
        for phoneme in phonemes {
            let phoneme = phoneme.as_ref();
            if is_malformed(phoneme) {
                return WordOutcome::Unavailable(UnavailableReason::MalformedSymbol(
                    phoneme.to_string(),
                ));
            }

            if self.apply(phoneme, &mut state) {
                continue;
            }

            if phoneme.chars().count() > 1 {
                let mut buf = [0u8; 4];
                for c in phoneme.chars() {
                    let part: &str = c.encode_utf8(&mut buf);
                    if !self.apply(part, &mut state) {
                        tracing::debug!(phoneme, part, lens = %self.profile.lens, "Unmapped phoneme part omitted");
                    }
                }
            } else {
                tracing::debug!(phoneme, lens = %self.profile.lens, "Unmapped phoneme omitted");
            }
        }

        WordOutcome::Rendered(self.apply_final_form(state.glyphs))
    }

    /// Applies the consonant or vowel rule for a single table key. Returns
    /// false (leaving the state untouched) if neither table has it.
    fn apply(&self, symbol: &str, state: &mut TransducerState) -> bool {
        if let Some(glyph) = self.profile.consonants.get(symbol) {
            state.glyphs.push_str(glyph);
            state.last_was_consonant = true;
            return true;
        }

        if let Some(mark) = self.profile.vowels.get(symbol) {
            if !state.last_was_consonant {
                if let Some(anchor) = &self.profile.vowel_anchor {
                    state.glyphs.push_str(anchor);
                }
            }
            state.glyphs.push_str(mark);
            state.last_was_consonant = self.profile.closes_syllable(mark);
            return true;
        }

        false
    }

    /// Replaces the rightmost glyph that has a final form. At most one
    /// substitution per word.
    fn apply_final_form(&self, glyphs: String) -> String {
        if self.profile.final_forms.is_empty() {
            return glyphs;
        }

        let mut chars: Vec<char> = glyphs.chars().collect();
        let rightmost = chars
            .iter()
            .enumerate()
            .rev()
            .find_map(|(idx, c)| self.profile.final_forms.get(c).map(|&f| (idx, f)));
        if let Some((idx, final_form)) = rightmost {
            chars[idx] = final_form;
        }
        chars.into_iter().collect()
    }
}

/// Shorthand for a one-off transduction.
pub fn transduce<S: AsRef<str>>(phonemes: &[S], profile: &ScriptProfile) -> WordOutcome {
    GraphemeTransducer::new(profile).transduce(phonemes)
}

fn is_malformed(symbol: &str) -> bool {
    symbol.is_empty() || symbol.chars().any(|c| c.is_whitespace() || c.is_control())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::profiles::ProfileRegistry;

    const QAMATS: char = '\u{05B8}';
    const HIRIQ: char = '\u{05B4}';
    const SHEVA: char = '\u{05B0}';
    const DAGESH: char = '\u{05BC}';
    const SHIN_DOT: char = '\u{05C1}';
    const GERESH: char = '\u{05F3}';
    const FATHA: char = '\u{064E}';

    fn render(lens: &str, phonemes: &[&str]) -> String {
        let registry = ProfileRegistry::bundled().unwrap();
        match transduce(phonemes, registry.resolve(lens)) {
            WordOutcome::Rendered(glyphs) => glyphs,
            other => panic!("expected a rendering, got {other:?}"),
        }
    }

    #[test]
    fn sam_gets_final_mem() {
        assert_eq!(render("hebrew", &["s", "a", "m"]), format!("ס{QAMATS}ם"));
        assert_eq!(
            render("hebrew", &["s", "a", "m"]),
            "\u{05E1}\u{05B8}\u{05DD}"
        );
    }

    #[test]
    fn word_initial_vowel_gets_carrier() {
        assert_eq!(
            render("hebrew", &["a", "b"]),
            format!("א{QAMATS}ב{DAGESH}")
        );
    }

    #[test]
    fn vowel_after_consonant_gets_no_carrier() {
        let out = render("hebrew", &["d", "a"]);
        assert_eq!(out, format!("ד{QAMATS}"));
        assert!(!out.contains('א'));
    }

    #[test]
    fn consecutive_vowels_each_get_a_carrier() {
        assert_eq!(
            render("hebrew", &["d", "a", "i"]),
            format!("ד{QAMATS}א{HIRIQ}")
        );
    }

    #[test]
    fn only_rightmost_final_form_is_substituted() {
        // Both mem and nun are eligible; only the nun changes.
        assert_eq!(render("hebrew", &["m", "a", "n"]), format!("מ{QAMATS}ן"));
    }

    #[test]
    fn final_form_targets_rightmost_eligible_glyph_not_last_letter() {
        // Lamed has no final form, so the scan continues to the nun.
        assert_eq!(render("hebrew", &["n", "a", "l"]), format!("ן{QAMATS}ל"));
    }

    #[test]
    fn final_form_skips_trailing_diacritics() {
        // פּ is pe + dagesh; the scan passes the dagesh and converts the pe.
        assert_eq!(render("hebrew", &["a", "p"]), format!("א{QAMATS}ף{DAGESH}"));
    }

    #[test]
    fn consonant_before_trailing_vowel_mark_takes_final_form() {
        assert_eq!(
            render("hebrew", &["s", "a", "m", "a"]),
            format!("ס{QAMATS}ם{QAMATS}")
        );
    }

    #[test]
    fn unknown_phoneme_is_omitted_without_touching_state() {
        // Hebrew has no glottal stop. The vowel after it still sees the
        // preceding consonant and gets no carrier.
        assert_eq!(render("hebrew", &["s", "ʔ", "a"]), format!("ס{QAMATS}"));
        assert_eq!(render("hebrew", &["ʔ"]), "");
    }

    #[test]
    fn composite_symbol_decomposes_in_order() {
        // Untied affricate is not a registered key.
        assert_eq!(render("hebrew", &["tʃ"]), format!("טש{SHIN_DOT}"));
        assert_eq!(render("arabic", &["ʃt"]), "شت");
    }

    #[test]
    fn registered_composite_is_used_whole() {
        assert_eq!(render("hebrew", &["t\u{0361}ʃ", "a"]), format!("ץ{GERESH}{QAMATS}"));
        assert_eq!(render("hebrew", &["a", "t\u{0361}ʃ"]), format!("א{QAMATS}ץ{GERESH}"));
    }

    #[test]
    fn decomposition_skips_unknown_parts() {
        // Stress mark + vowel, as some phonemizers emit.
        assert_eq!(render("hebrew", &["s", "ˈa"]), format!("ס{QAMATS}"));
    }

    #[test]
    fn r_colored_vowel_counts_as_consonant() {
        assert_eq!(
            render("hebrew", &["ɚ", "a"]),
            format!("א{SHEVA}ר{QAMATS}")
        );
    }

    #[test]
    fn arabic_uses_alif_carrier_and_no_final_forms() {
        assert_eq!(render("arabic", &["a", "m"]), format!("ا{FATHA}م"));
        assert_eq!(render("arabic", &["s", "a", "m"]), format!("س{FATHA}م"));
    }

    #[test]
    fn empty_vowel_mark_still_consumes_carrier_slot() {
        // Schwa is implicit in the Arabic lens, but a word-initial one still
        // gets its alif.
        assert_eq!(render("arabic", &["ə", "n"]), "ان");
    }

    #[test]
    fn syllabic_lens_never_inserts_carrier() {
        assert_eq!(render("indic", &["s", "a", "m"]), "\u{0938}\u{093E}\u{092E}");
        assert_eq!(render("indic", &["a", "i"]), "\u{093E}\u{0940}");
    }

    #[test]
    fn empty_input_is_unavailable() {
        let registry = ProfileRegistry::bundled().unwrap();
        let empty: [&str; 0] = [];
        assert_eq!(
            transduce(&empty, registry.resolve("hebrew")),
            WordOutcome::Unavailable(UnavailableReason::NoPhonemes)
        );
    }

    #[test]
    fn malformed_symbol_is_unavailable() {
        let registry = ProfileRegistry::bundled().unwrap();
        let outcome = transduce(&["s", "", "m"], registry.resolve("hebrew"));
        assert!(!outcome.is_rendered());
        assert_eq!(outcome.to_string(), crate::core::types::UNAVAILABLE_SENTINEL);

        let outcome = transduce(&["s a"], registry.resolve("hebrew"));
        assert_eq!(
            outcome,
            WordOutcome::Unavailable(UnavailableReason::MalformedSymbol("s a".into()))
        );
    }

    #[test]
    fn transduction_is_deterministic() {
        let registry = ProfileRegistry::bundled().unwrap();
        let phonemes = ["d", "ʒ", "oʊ", "n", "ɚ"];
        for lens in ["hebrew", "arabic", "indic"] {
            let transducer = GraphemeTransducer::new(registry.resolve(lens));
            let first = transducer.transduce(&phonemes);
            for _ in 0..5 {
                assert_eq!(transducer.transduce(&phonemes), first);
            }
        }
    }
}
