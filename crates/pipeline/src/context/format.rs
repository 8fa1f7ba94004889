//! Rendering of context snippets and the final prompt.

use contextor_core::{ScoredResult, WebSnippet};

pub fn format_history(result: &ScoredResult) -> String {
    let mut header = format!(
        "[CHAT HISTORY | Similarity: {:.3} | Chat: {}",
        result.similarity, result.metadata.conversation_id
    );
    if let Some(updated) = result.metadata.last_updated {
        header.push_str(&format!(" | Date: {}", updated.format("%Y-%m-%d")));
    }
    format!("{header}]\n{}\n---", result.content.trim())
}

pub fn format_web(snippet: &WebSnippet) -> String {
    format!(
        "[WEB SEARCH | Source: {} | URL: {}]\nTitle: {}\nContent: {}\n---",
        snippet.source, snippet.url, snippet.title, snippet.content
    )
}

/// Wrap rendered context around the query. Without context the prompt is
/// the query itself.
pub fn build_prompt(parts: &[String], query: &str) -> String {
    if parts.is_empty() {
        return query.to_string();
    }
    format!(
        "\nAnswer the user query using your knowledge and the relevant context below.\nRELEVANT CONTEXT: {}\nUSER QUERY: {}",
        parts.join("\n"),
        query
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use contextor_core::DocumentMetadata;

    fn scored(last_updated: Option<chrono::DateTime<Utc>>) -> ScoredResult {
        ScoredResult {
            content: "  [USER]: hi\n\n[ASSISTANT]: hello \n".into(),
            metadata: DocumentMetadata {
                conversation_id: "chat-7".into(),
                message_count: 2,
                last_updated,
                source_file: "chat-7.json".into(),
                chunk_kind: None,
            },
            similarity: 0.81234,
            token_count: 9,
        }
    }

    #[test]
    fn history_header_with_date() {
        let ts = Utc.with_ymd_and_hms(2024, 2, 29, 23, 0, 0).unwrap();
        assert_eq!(
            format_history(&scored(Some(ts))),
            "[CHAT HISTORY | Similarity: 0.812 | Chat: chat-7 | Date: 2024-02-29]\n[USER]: hi\n\n[ASSISTANT]: hello\n---"
        );
    }

    #[test]
    fn history_header_without_date() {
        assert!(format_history(&scored(None)).starts_with("[CHAT HISTORY | Similarity: 0.812 | Chat: chat-7]\n"));
    }

    #[test]
    fn web_block() {
        let snippet = WebSnippet {
            title: "Rust".into(),
            url: "https://rust-lang.org".into(),
            source: "duckduckgo".into(),
            content: "A language".into(),
            rank: 1,
            token_count: 3,
            scraped: true,
        };
        assert_eq!(
            format_web(&snippet),
            "[WEB SEARCH | Source: duckduckgo | URL: https://rust-lang.org]\nTitle: Rust\nContent: A language\n---"
        );
    }

    #[test]
    fn empty_context_is_bare_query() {
        assert_eq!(build_prompt(&[], "hello"), "hello");
    }

    #[test]
    fn prompt_template() {
        let prompt = build_prompt(&["a".into(), "b".into()], "q?");
        assert_eq!(
            prompt,
            "\nAnswer the user query using your knowledge and the relevant context below.\nRELEVANT CONTEXT: a\nb\nUSER QUERY: q?"
        );
    }
}
