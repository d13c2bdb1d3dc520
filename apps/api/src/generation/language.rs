//! Prompt-language detection so generated slide copy matches the language the
//! user wrote their request in.
//!
//! Pure heuristics: function-word hits, diacritics, and Unicode script
//! ranges, checked in a fixed order. First match wins; anything unmatched is
//! treated as English.

const SPANISH_WORDS: &[&str] = &[
    "el", "la", "los", "las", "un", "una", "es", "son", "está", "están", "qué", "cómo", "cuándo",
    "dónde",
];
const SPANISH_CHARS: &str = "áéíóúüñ¿¡";

const FRENCH_WORDS: &[&str] = &[
    "le", "la", "les", "un", "une", "des", "et", "est", "sont", "que", "qui", "quoi", "comment",
    "quand", "où", "pourquoi",
];
const FRENCH_CHARS: &str = "àâäéèêëïîôöùûüÿç";

const GERMAN_WORDS: &[&str] = &[
    "der", "die", "das", "den", "dem", "des", "ein", "eine", "einen", "ist", "sind", "war",
    "waren", "was", "wer", "wie", "wann", "wo", "warum",
];
const GERMAN_CHARS: &str = "äöüß";

const PORTUGUESE_WORDS: &[&str] = &[
    "o", "a", "os", "as", "um", "uma", "uns", "umas", "é", "são", "está", "estão", "que", "quem",
    "como", "quando", "onde",
];
const PORTUGUESE_CHARS: &str = "áâãéêíóôõúç";

const ITALIAN_WORDS: &[&str] = &[
    "il", "lo", "la", "i", "gli", "le", "un", "uno", "una", "è", "sono", "che", "chi", "come",
    "quando", "dove", "perché",
];
const ITALIAN_CHARS: &str = "àèéìíîòóùú";

fn words<'a>(text: &'a str) -> impl Iterator<Item = &'a str> {
    text.split(|c: char| !c.is_alphabetic()).filter(|w| !w.is_empty())
}

fn has_word(text: &str, vocabulary: &[&str]) -> bool {
    words(text).any(|w| vocabulary.contains(&w))
}

fn has_char(text: &str, set: &str) -> bool {
    text.chars().any(|c| set.contains(c))
}

fn in_range(text: &str, lo: u32, hi: u32) -> bool {
    text.chars().any(|c| {
        let cp = c as u32;
        cp >= lo && cp <= hi
    })
}

/// Guesses the dominant natural language of `text`. Returns a display name
/// suitable for direct interpolation into a prompt.
pub fn detect_language(text: &str) -> &'static str {
    if text.trim().is_empty() {
        return "English";
    }
    let lower = text.to_lowercase();

    if has_word(&lower, SPANISH_WORDS) || has_char(&lower, SPANISH_CHARS) {
        return "Spanish";
    }
    if has_word(&lower, FRENCH_WORDS) || has_char(&lower, FRENCH_CHARS) {
        return "French";
    }
    if has_word(&lower, GERMAN_WORDS) || has_char(&lower, GERMAN_CHARS) {
        return "German";
    }
    if has_word(&lower, PORTUGUESE_WORDS) || has_char(&lower, PORTUGUESE_CHARS) {
        return "Portuguese";
    }
    if has_word(&lower, ITALIAN_WORDS) || has_char(&lower, ITALIAN_CHARS) {
        return "Italian";
    }

    // CJK and other scripts are checked on the raw text.
    if in_range(text, 0x4E00, 0x9FFF) {
        return "Chinese";
    }
    if in_range(text, 0x3040, 0x309F) || in_range(text, 0x30A0, 0x30FF) {
        return "Japanese";
    }
    if in_range(text, 0xAC00, 0xD7AF) {
        return "Korean";
    }
    if in_range(text, 0x0600, 0x06FF) {
        return "Arabic";
    }
    if in_range(text, 0x0400, 0x04FF) {
        return "Russian";
    }

    "English"
}
