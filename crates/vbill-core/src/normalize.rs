//! Lexical normalization: case folding plus spoken-numeral substitution.
//!
//! Only exact entries of [`NUMERAL_WORDS`] are rewritten, and only as whole
//! words. "twenty five" stays two numbers; "twenty-five" becomes "20-5".
//! Normalization never fails.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Spoken numeral words and their digit strings: English, romanized Tamil,
/// Tamil script.
pub const NUMERAL_WORDS: &[(&str, &str)] = &[
    ("zero", "0"),
    ("one", "1"),
    ("two", "2"),
    ("three", "3"),
    ("four", "4"),
    ("five", "5"),
    ("six", "6"),
    ("seven", "7"),
    ("eight", "8"),
    ("nine", "9"),
    ("ten", "10"),
    ("eleven", "11"),
    ("twelve", "12"),
    ("thirteen", "13"),
    ("fourteen", "14"),
    ("fifteen", "15"),
    ("sixteen", "16"),
    ("seventeen", "17"),
    ("eighteen", "18"),
    ("nineteen", "19"),
    ("twenty", "20"),
    ("thirty", "30"),
    ("forty", "40"),
    ("fifty", "50"),
    ("sixty", "60"),
    ("seventy", "70"),
    ("eighty", "80"),
    ("ninety", "90"),
    ("hundred", "100"),
    ("thousand", "1000"),
    ("half", "0.5"),
    ("quarter", "0.25"),
    // romanized Tamil
    ("onnu", "1"),
    ("ondru", "1"),
    ("rendu", "2"),
    ("irandu", "2"),
    ("moonu", "3"),
    ("naalu", "4"),
    ("anju", "5"),
    ("aaru", "6"),
    ("ezhu", "7"),
    ("ettu", "8"),
    ("ombadhu", "9"),
    ("pathu", "10"),
    ("irubathu", "20"),
    ("aimbadhu", "50"),
    ("nooru", "100"),
    ("aayiram", "1000"),
    ("arai", "0.5"),
    ("kaal", "0.25"),
    // Tamil script
    ("ஒன்று", "1"),
    ("இரண்டு", "2"),
    ("மூன்று", "3"),
    ("நான்கு", "4"),
    ("ஐந்து", "5"),
    ("ஆறு", "6"),
    ("ஏழு", "7"),
    ("எட்டு", "8"),
    ("ஒன்பது", "9"),
    ("பத்து", "10"),
    ("இருபது", "20"),
    ("ஐம்பது", "50"),
    ("நூறு", "100"),
    ("ஆயிரம்", "1000"),
    ("அரை", "0.5"),
];

static NUMERAL_LOOKUP: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| NUMERAL_WORDS.iter().copied().collect());

static NUMERAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    let mut words: Vec<&str> = NUMERAL_WORDS.iter().map(|(w, _)| *w).collect();
    words.sort_by_key(|w| std::cmp::Reverse(w.len()));
    let alternation = words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"\b(?:{alternation})\b")).unwrap()
});

/// Lowercases and trims `utterance`, then replaces every numeral word from
/// [`NUMERAL_WORDS`] with its digits.
pub fn normalize(utterance: &str) -> String {
    let folded = utterance.trim().to_lowercase();
    NUMERAL_RE
        .replace_all(&folded, |caps: &Captures<'_>| {
            let word = &caps[0];
            NUMERAL_LOOKUP.get(word).copied().unwrap_or(word).to_string()
        })
        .into_owned()
}
