//! Small string helpers shared by the chunker and web crates.

/// Keep the first `max_chars` characters, appending `...` when cut.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    truncate_with(text, max_chars, "...")
}

/// Keep the first `max_chars` characters, appending `suffix` when cut.
pub fn truncate_with(text: &str, max_chars: usize, suffix: &str) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte, _)) => format!("{}{suffix}", &text[..byte]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_is_char_based() {
        assert_eq!(truncate_chars("héllo", 2), "hé...");
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("exact", 5), "exact");
        assert_eq!(truncate_chars("abc", 0), "...");
        assert_eq!(truncate_with("abcd", 2, "…"), "ab…");
    }
}
