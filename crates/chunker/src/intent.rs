//! Buckets messages by the first intent pattern they match.

use contextor_core::error::ChunkError;
use contextor_core::{Chunk, ChunkKind, Conversation, Message, Role};
use regex::{Regex, RegexBuilder};

const GENERAL: &str = "general";

/// Checked in order; the first match wins.
const PATTERNS: &[(&str, &str)] = &[
    ("question", r"\?|how|what|when|where|why|who|can you|could you"),
    ("request", r"please|can you|could you|would you|help me"),
    ("code", r"```|function|class|import|def |return |print\("),
    ("explanation", r"explain|describe|tell me about|what is"),
    ("problem", r"error|issue|problem|not working|broken|help"),
];

#[derive(Debug)]
pub(crate) struct IntentPatterns {
    compiled: Vec<(&'static str, Regex)>,
}

impl IntentPatterns {
    pub(crate) fn compile() -> Result<Self, ChunkError> {
        let compiled = PATTERNS
            .iter()
            .map(|(intent, pattern)| {
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map(|re| (*intent, re))
                    .map_err(|e| ChunkError::InvalidConfig(format!("intent pattern {intent}: {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { compiled })
    }

    pub(crate) fn classify(&self, content: &str) -> &'static str {
        self.compiled
            .iter()
            .find(|(_, re)| re.is_match(content))
            .map(|(intent, _)| *intent)
            .unwrap_or(GENERAL)
    }
}

pub(crate) fn chunk(conversation: &Conversation, patterns: &IntentPatterns) -> Vec<Chunk> {
    // Buckets in first-seen order
    let mut buckets: Vec<(&'static str, Vec<Message>)> = Vec::new();
    for message in &conversation.messages {
        let intent = patterns.classify(&message.content);
        match buckets.iter_mut().find(|(name, _)| *name == intent) {
            Some((_, messages)) => messages.push(message.clone()),
            None => buckets.push((intent, vec![message.clone()])),
        }
    }

    buckets
        .into_iter()
        .map(|(intent, messages)| {
            let strength = messages.iter().filter(|m| m.role == Role::User).count();
            Chunk::new(
                ChunkKind::Intent,
                &conversation.id,
                crate::text::render_messages(&messages),
            )
            .with_meta("intent", intent)
            .with_meta("message_count", messages.len())
            .with_meta("intent_strength", strength)
            .with_messages(messages)
        })
        .collect()
}
