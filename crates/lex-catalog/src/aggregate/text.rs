//! Description tokenization.
//!
//! Token policy: descriptions are joined with a single space and split on
//! whitespace. Each token is trimmed of leading and trailing characters that
//! are not alphanumeric and lowercased. Empty tokens and stop words are
//! dropped. Inner punctuation such as apostrophes and hyphens is kept.

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// English stop words removed from description tokens.
pub const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "aren't", "as", "at", "be", "because", "been", "before", "being", "below", "between",
    "both", "but", "by", "can", "can't", "cannot", "com", "could", "couldn't", "did", "didn't",
    "do", "does", "doesn't", "doing", "don't", "down", "during", "each", "else", "ever", "few",
    "for", "from", "further", "get", "had", "hadn't", "has", "hasn't", "have", "haven't",
    "having", "he", "he'd", "he'll", "he's", "hence", "her", "here", "here's", "hers", "herself",
    "him", "himself", "his", "how", "how's", "however", "http", "i", "i'd", "i'll", "i'm",
    "i've", "if", "in", "into", "is", "isn't", "it", "it's", "its", "itself", "just", "k",
    "let's", "like", "me", "more", "most", "mustn't", "my", "myself", "no", "nor", "not", "of",
    "off", "on", "once", "only", "or", "other", "otherwise", "ought", "our", "ours",
    "ourselves", "out", "over", "own", "r", "same", "shall", "shan't", "she", "she'd",
    "she'll", "she's", "should", "shouldn't", "since", "so", "some", "such", "than", "that",
    "that's", "the", "their", "theirs", "them", "themselves", "then", "there", "there's",
    "therefore", "these", "they", "they'd", "they'll", "they're", "they've", "this", "those",
    "through", "to", "too", "under", "until", "up", "very", "was", "wasn't", "we", "we'd",
    "we'll", "we're", "we've", "were", "weren't", "what", "what's", "when", "when's", "where",
    "where's", "which", "while", "who", "who's", "whom", "why", "why's", "with", "won't",
    "would", "wouldn't", "www", "you", "you'd", "you'll", "you're", "you've", "your", "yours",
    "yourself", "yourselves",
];

/// The built-in stop-word set.
pub static DEFAULT_STOP_WORDS: Lazy<HashSet<String>> = Lazy::new(|| {
    ENGLISH_STOP_WORDS
        .iter()
        .map(|word| word.to_string())
        .collect()
});

/// Normalize one whitespace-delimited token, `None` if nothing remains.
pub fn normalize_token(token: &str) -> Option<String> {
    let trimmed = token.trim_matches(|c: char| !c.is_alphanumeric());
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Tokens of `text` with stop words removed.
pub fn content_tokens<'a>(
    text: &'a str,
    stop_words: &'a HashSet<String>,
) -> impl Iterator<Item = String> + 'a {
    text.split_whitespace()
        .filter_map(normalize_token)
        .filter(move |token| !stop_words.contains(token))
}
