// File: src/scoring.rs
//! Letter-value scoring ("power") of a transliteration.

use std::collections::HashMap;

use crate::core::types::ScriptProfile;

/// Sums the value of every character that has one. Diacritics, spaces and
/// unknown characters count as zero.
pub fn letter_value_sum(text: &str, values: &HashMap<char, u32>) -> u64 {
    text.chars()
        .filter_map(|c| values.get(&c))
        .map(|&v| u64::from(v))
        .sum()
}

/// Scores `text` with the profile's letter-value table, or `None` if the
/// profile defines no values.
pub fn score(text: &str, profile: &ScriptProfile) -> Option<u64> {
    if profile.letter_values.is_empty() {
        None
    } else {
        Some(letter_value_sum(text, &profile.letter_values))
    }
}
