//! Frequency-based keyword extraction.
//!
//! Words are maximal runs of `\w` characters in the lowercased text. A
//! keyword is a word of at least four characters that is not a stop-word.
//! Ranking is by descending count, ties broken by first occurrence, so the
//! output is deterministic.

use std::collections::HashMap;

use contextor_core::Message;

const MIN_KEYWORD_CHARS: usize = 4;

const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "is",
    "are", "was", "were", "you", "i", "me", "my", "your", "this", "that", "it", "can", "could",
    "would", "should",
];

/// Label used when no keyword qualifies.
pub const DEFAULT_TOPIC: &str = "general_discussion";

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !is_word_char(c))
        .filter(|w| !w.is_empty())
}

/// Ranked `(keyword, count)` pairs over all message contents.
pub(crate) fn ranked_keywords(messages: &[Message]) -> Vec<(String, usize)> {
    let joined = messages
        .iter()
        .map(|m| m.content.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    // word -> (count, first position)
    let mut freq: HashMap<&str, (usize, usize)> = HashMap::new();
    for (position, word) in words(&joined).enumerate() {
        if word.chars().count() < MIN_KEYWORD_CHARS || STOP_WORDS.contains(&word) {
            continue;
        }
        freq.entry(word).or_insert((0, position)).0 += 1;
    }

    let mut ranked: Vec<(&str, usize, usize)> = freq
        .into_iter()
        .map(|(word, (count, first))| (word, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    ranked
        .into_iter()
        .map(|(word, count, _)| (word.to_string(), count))
        .collect()
}

/// The `n` most frequent keywords.
pub fn top_keywords(messages: &[Message], n: usize) -> Vec<String> {
    ranked_keywords(messages)
        .into_iter()
        .take(n)
        .map(|(word, _)| word)
        .collect()
}

/// The single most frequent keyword, or [`DEFAULT_TOPIC`].
pub fn topic_label(messages: &[Message]) -> String {
    top_keywords(messages, 1)
        .into_iter()
        .next()
        .unwrap_or_else(|| DEFAULT_TOPIC.to_string())
}
