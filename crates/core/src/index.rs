//! Vector index and conversation store contracts.
//!
//! Searches take `&self` and rebuilds take `&mut self`, so an index placed
//! behind a read/write lock gets shared searches and exclusive rebuilds
//! without any locking of its own.

use async_trait::async_trait;

use crate::error::IndexError;
use crate::message::Conversation;
use crate::retrieval::IndexedDocument;

/// Nearest-neighbor storage for embedded documents.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// The backend name (e.g., "in_memory").
    fn name(&self) -> &str;

    /// Add documents. Embeddings must share one dimension.
    async fn add(&mut self, documents: Vec<IndexedDocument>) -> Result<(), IndexError>;

    /// Up to `k` documents ordered by descending cosine similarity to `query`.
    async fn nearest_neighbors(
        &self,
        query: &[f32],
        k: usize,
    ) -> Result<Vec<IndexedDocument>, IndexError>;

    /// Total number of stored documents.
    async fn count(&self) -> Result<usize, IndexError>;

    /// Remove every document.
    async fn clear(&mut self) -> Result<(), IndexError>;

    /// Persist the current contents, if the backend is durable.
    async fn persist(&self) -> Result<(), IndexError> {
        Ok(())
    }

    /// Whether the index was restored from durable storage at startup.
    fn restored(&self) -> bool {
        false
    }
}

/// Read-only enumeration of stored conversations.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    fn name(&self) -> &str;

    /// All conversations, in a stable order.
    async fn conversations(&self) -> Result<Vec<Conversation>, IndexError>;
}
