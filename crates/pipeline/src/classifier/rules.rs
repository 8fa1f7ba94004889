//! Keyword rules used when the model gives no usable answer.

use contextor_core::ClassificationDecision;

const WEB_KEYWORDS: &[&str] = &[
    "current", "latest", "recent", "today", "news", "weather", "price", "stock",
];

const HISTORY_KEYWORDS: &[&str] = &[
    "we discussed",
    "you said",
    "earlier",
    "previous",
    "remember",
    "mentioned",
];

/// Decide from the query text and, when one arrived, the model's reply.
pub fn fallback_decision(query: &str, reply: Option<&str>) -> ClassificationDecision {
    let query = query.to_lowercase();
    let reply = reply.unwrap_or_default().to_lowercase();

    let needs_web_search =
        WEB_KEYWORDS.iter().any(|k| query.contains(k)) || reply.contains("web");
    let needs_chat_history =
        HISTORY_KEYWORDS.iter().any(|k| query.contains(k)) || reply.contains("history");

    ClassificationDecision::new(needs_web_search, needs_chat_history)
}
