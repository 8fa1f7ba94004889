//! Retrieval value types: indexed documents, scored history results, and
//! web search results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::chunk::ChunkKind;

/// Provenance of an indexed document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub conversation_id: String,

    pub message_count: usize,

    /// Newest message timestamp in the source conversation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,

    pub source_file: String,

    /// Strategy used to split the conversation, `None` for whole conversations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_kind: Option<ChunkKind>,
}

/// A document stored in the vector index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedDocument {
    pub content: String,
    pub embedding: Vec<f32>,
    pub metadata: DocumentMetadata,
}

/// A history snippet scored against one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredResult {
    pub content: String,
    pub metadata: DocumentMetadata,
    /// Cosine similarity to the query, in [-1, 1]
    pub similarity: f32,
    pub token_count: usize,
}

/// One hit from a web search collaborator, in rank order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
    pub source: String,
}

/// A web result with its best available text attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebSnippet {
    pub title: String,
    pub url: String,
    pub source: String,
    /// Scraped page text, or the search snippet when scraping failed
    pub content: String,
    /// Zero-based position in the search results
    pub rank: usize,
    pub token_count: usize,
    /// Whether `content` came from the page rather than the snippet
    pub scraped: bool,
}
