//! Chunk: a derived, disposable unit of conversation text.

use serde::{Deserialize, Serialize};

use crate::message::Message;

/// Which segmentation strategy produced a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkKind {
    Temporal,
    Topic,
    SlidingWindow,
    Turn,
    Semantic,
    Intent,
}

impl ChunkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChunkKind::Temporal => "temporal",
            ChunkKind::Topic => "topic",
            ChunkKind::SlidingWindow => "sliding_window",
            ChunkKind::Turn => "turn",
            ChunkKind::Semantic => "semantic",
            ChunkKind::Intent => "intent",
        }
    }
}

impl std::fmt::Display for ChunkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ChunkKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "temporal" => Ok(ChunkKind::Temporal),
            "topic" => Ok(ChunkKind::Topic),
            "sliding_window" | "sliding" => Ok(ChunkKind::SlidingWindow),
            "turn" | "turns" => Ok(ChunkKind::Turn),
            "semantic" => Ok(ChunkKind::Semantic),
            "intent" => Ok(ChunkKind::Intent),
            other => Err(format!(
                "unknown chunk strategy '{other}' (expected temporal, topic, sliding_window, turn, semantic or intent)"
            )),
        }
    }
}

/// An independently indexable unit of conversation text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Strategy that produced this chunk
    pub kind: ChunkKind,

    /// Rendered text
    pub content: String,

    /// Identifier of the conversation the chunk came from
    pub source_ref: String,

    /// The messages the chunk was built from. Empty for sliding-window
    /// chunks, which are character ranges rather than message groups.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<Message>,

    /// Strategy-specific details (topic label, window start, signature, ...)
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl Chunk {
    pub fn new(kind: ChunkKind, source_ref: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
            source_ref: source_ref.into(),
            messages: Vec::new(),
            metadata: serde_json::Map::new(),
        }
    }

    pub fn with_messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = messages;
        self
    }

    pub fn with_meta(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_serializes_snake_case() {
        let json = serde_json::to_string(&ChunkKind::SlidingWindow).unwrap();
        assert_eq!(json, "\"sliding_window\"");
    }

    #[test]
    fn kind_parses_cli_spellings() {
        assert_eq!("sliding-window".parse::<ChunkKind>(), Ok(ChunkKind::SlidingWindow));
        assert_eq!("Intent".parse::<ChunkKind>(), Ok(ChunkKind::Intent));
        assert!("paragraph".parse::<ChunkKind>().is_err());
    }

    #[test]
    fn builder_attaches_metadata() {
        let chunk = Chunk::new(ChunkKind::Topic, "conv-1", "[USER]: hello")
            .with_meta("topic", "hello")
            .with_messages(vec![Message::user("hello")]);
        assert_eq!(chunk.metadata["topic"], "hello");
        assert_eq!(chunk.messages.len(), 1);
        assert_eq!(chunk.source_ref, "conv-1");
    }
}
