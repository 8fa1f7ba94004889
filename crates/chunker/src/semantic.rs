//! Greedy grouping by keyword-set overlap.

use std::collections::HashSet;

use contextor_core::{Chunk, ChunkKind, Conversation, Message};
use sha2::{Digest, Sha256};

use crate::keywords::top_keywords;
use crate::text::render_messages;

const KEYWORDS_PER_SET: usize = 5;
const JACCARD_THRESHOLD: f64 = 0.3;

fn keyword_set(messages: &[Message]) -> HashSet<String> {
    top_keywords(messages, KEYWORDS_PER_SET).into_iter().collect()
}

fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

fn belongs_to(group: &[Message], message: &Message) -> bool {
    let group_keywords = keyword_set(group);
    let message_keywords = keyword_set(std::slice::from_ref(message));
    if group_keywords.is_empty() || message_keywords.is_empty() {
        return false;
    }
    jaccard(&group_keywords, &message_keywords) > JACCARD_THRESHOLD
}

/// First 8 hex chars of SHA-256 over the sorted keywords joined by `|`.
pub(crate) fn semantic_signature(keywords: &[String]) -> String {
    let mut sorted = keywords.to_vec();
    sorted.sort();
    let digest = Sha256::digest(sorted.join("|").as_bytes());
    let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    hex[..8].to_string()
}

pub(crate) fn chunk(conversation: &Conversation) -> Vec<Chunk> {
    let mut groups: Vec<Vec<Message>> = Vec::new();
    let mut current: Vec<Message> = Vec::new();

    for message in &conversation.messages {
        if current.is_empty() || belongs_to(&current, message) {
            current.push(message.clone());
        } else {
            groups.push(std::mem::replace(&mut current, vec![message.clone()]));
        }
    }
    if !current.is_empty() {
        groups.push(current);
    }

    groups
        .into_iter()
        .enumerate()
        .map(|(group_id, group)| {
            let keywords = top_keywords(&group, KEYWORDS_PER_SET);
            Chunk::new(ChunkKind::Semantic, &conversation.id, render_messages(&group))
                .with_meta("group_id", group_id)
                .with_meta("semantic_signature", semantic_signature(&keywords))
                .with_meta("keywords", keywords)
                .with_meta("message_count", group.len())
                .with_messages(group)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn related_messages_share_a_group() {
        let conversation = Conversation::new(
            "c",
            vec![
                Message::user("tokio runtime spawning tasks"),
                Message::assistant("tokio runtime spawns tasks onto workers"),
                Message::user("favourite pasta recipe"),
            ],
        );
        let chunks = chunk(&conversation);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].messages.len(), 2);
        assert_eq!(chunks[1].messages[0].content, "favourite pasta recipe");
    }

    #[test]
    fn keywordless_message_starts_new_group() {
        let conversation = Conversation::new(
            "c",
            vec![Message::user("tokio runtime"), Message::assistant("ok"), Message::user("yes")],
        );
        assert_eq!(chunk(&conversation).len(), 3);
    }

    #[test]
    fn signature_ignores_keyword_order() {
        let a = semantic_signature(&["tokio".into(), "runtime".into()]);
        let b = semantic_signature(&["runtime".into(), "tokio".into()]);
        assert_eq!(a, b);
        assert_eq!(a.len(), 8);
        assert_ne!(a, semantic_signature(&["pasta".into()]));
    }

    #[test]
    fn jaccard_of_disjoint_sets_is_zero() {
        let a: HashSet<String> = ["alpha".to_string()].into_iter().collect();
        let b: HashSet<String> = ["beta".to_string()].into_iter().collect();
        assert_eq!(jaccard(&a, &b), 0.0);
        assert_eq!(jaccard(&a, &a), 1.0);
    }
}
