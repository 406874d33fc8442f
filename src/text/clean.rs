//! Text normalization shared by training and inference.
//!
//! URLs are dropped, then everything except ASCII letters and whitespace,
//! then the text is lowercased and English stop words are removed.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

static URL_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"http\S+").unwrap());
static NON_ALPHA_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-zA-Z\s]").unwrap());

/// English stop words. Contractions are listed without apostrophes because
/// punctuation is stripped before the lookup.
const ENGLISH_STOP_WORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
    "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers", "herself",
    "it", "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
    "who", "whom", "this", "that", "these", "those", "am", "is", "are", "was", "were", "be",
    "been", "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an",
    "the", "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by",
    "for", "with", "about", "against", "between", "into", "through", "during", "before",
    "after", "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over",
    "under", "again", "further", "then", "once", "here", "there", "when", "where", "why",
    "how", "all", "any", "both", "each", "few", "more", "most", "other", "some", "such", "no",
    "nor", "not", "only", "own", "same", "so", "than", "too", "very", "s", "t", "can", "will",
    "just", "don", "should", "now", "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren",
    "couldn", "didn", "doesn", "hadn", "hasn", "haven", "isn", "ma", "mightn", "mustn",
    "needn", "shan", "shouldn", "wasn", "weren", "won", "wouldn",
];

static STOP_WORDS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ENGLISH_STOP_WORDS.iter().copied().collect());

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(word)
}

/// Normalize raw text into space-separated, lowercase content words.
pub fn clean_text(text: &str) -> String {
    let without_urls = URL_PATTERN.replace_all(text, "");
    let letters_only = NON_ALPHA_PATTERN.replace_all(&without_urls, "");
    letters_only
        .to_lowercase()
        .split_whitespace()
        .filter(|word| !is_stop_word(word))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_urls_and_punctuation() {
        let cleaned = clean_text("Check https://example.com/x?y=1 NOW!!! Coding's great|||fun");
        assert_eq!(cleaned, "check codings greatfun");
    }

    #[test]
    fn test_removes_stop_words_and_lowercases() {
        assert_eq!(
            clean_text("I really LOVE the quiet of the Library"),
            "really love quiet library"
        );
    }

    #[test]
    fn test_contractions_lose_apostrophe_before_lookup() {
        // "don't" becomes "dont", which is not a stop word; "don" is.
        assert_eq!(clean_text("don't don"), "dont");
    }

    #[test]
    fn test_digits_only_text_becomes_empty() {
        assert_eq!(clean_text("12345 67890 !!! ???"), "");
        assert_eq!(clean_text("the and of to"), "");
    }

    #[test]
    fn test_cleaning_is_idempotent() {
        let once = clean_text("Thinking about abstract THEORIES, http://a.b and people.");
        assert_eq!(clean_text(&once), once);
    }
}
