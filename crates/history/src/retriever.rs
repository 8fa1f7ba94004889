//! Similarity search over past conversations.
//!
//! The index is built lazily: the first search on an unbuilt index loads the
//! store, chunks it, and embeds every document before answering. Searches
//! share a read lock; a rebuild holds the write lock until it is done.

use std::collections::HashSet;
use std::sync::Arc;

use contextor_chunker::{ChunkStrategy, Chunker};
use contextor_core::error::IndexError;
use contextor_core::{
    ConversationStore, Embedder, IndexedDocument, ScoredResult, Tokenizer, VectorIndex,
};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::builder::build_documents;
use crate::vector::cosine_similarity;

struct IndexState {
    index: Box<dyn VectorIndex>,
    built: bool,
}

/// Outcome of an index build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BuildStats {
    pub conversations: usize,
    pub documents: usize,
}

/// Snapshot of the index for status reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexStatus {
    pub backend: String,
    pub built: bool,
    pub documents: usize,
}

pub struct HistoryRetriever {
    store: Arc<dyn ConversationStore>,
    embedder: Arc<dyn Embedder>,
    tokenizer: Arc<dyn Tokenizer>,
    chunker: Chunker,
    strategy: ChunkStrategy,
    state: RwLock<IndexState>,
}

impl HistoryRetriever {
    /// An index restored from disk counts as built.
    pub fn new(
        store: Arc<dyn ConversationStore>,
        embedder: Arc<dyn Embedder>,
        tokenizer: Arc<dyn Tokenizer>,
        index: Box<dyn VectorIndex>,
        chunker: Chunker,
        strategy: ChunkStrategy,
    ) -> Self {
        let built = index.restored();
        Self {
            store,
            embedder,
            tokenizer,
            chunker,
            strategy,
            state: RwLock::new(IndexState { index, built }),
        }
    }

    /// Up to `k` results, most similar first, with unique content.
    pub async fn search(&self, query: &str, k: usize) -> Result<Vec<ScoredResult>, IndexError> {
        if k == 0 {
            return Ok(Vec::new());
        }

        {
            let state = self.state.read().await;
            if state.built {
                return self.search_built(state.index.as_ref(), query, k).await;
            }
        }

        {
            let mut state = self.state.write().await;
            // Another caller may have built it while we waited
            if !state.built {
                info!(strategy = %self.strategy, "History index not built, building before first search");
                self.build_locked(&mut state).await?;
            }
        }

        let state = self.state.read().await;
        self.search_built(state.index.as_ref(), query, k).await
    }

    /// Drop the index and rebuild it from the store.
    pub async fn rebuild_index(&self) -> Result<BuildStats, IndexError> {
        let mut state = self.state.write().await;
        self.build_locked(&mut state).await
    }

    pub async fn status(&self) -> Result<IndexStatus, IndexError> {
        let state = self.state.read().await;
        Ok(IndexStatus {
            backend: state.index.name().to_string(),
            built: state.built,
            documents: state.index.count().await?,
        })
    }

    async fn build_locked(&self, state: &mut IndexState) -> Result<BuildStats, IndexError> {
        let conversations = self.store.conversations().await?;
        let pending = build_documents(&self.chunker, self.strategy, &conversations);

        let texts: Vec<String> = pending.iter().map(|d| d.content.clone()).collect();
        let embeddings = self.embedder.embed_documents(&texts).await?;
        if embeddings.len() != pending.len() {
            return Err(IndexError::EmbeddingFailed(format!(
                "expected {} embeddings, got {}",
                pending.len(),
                embeddings.len()
            )));
        }

        let documents: Vec<IndexedDocument> = pending
            .into_iter()
            .zip(embeddings)
            .map(|(doc, embedding)| IndexedDocument {
                content: doc.content,
                embedding,
                metadata: doc.metadata,
            })
            .collect();
        let stats = BuildStats {
            conversations: conversations.len(),
            documents: documents.len(),
        };

        state.index.clear().await?;
        state.index.add(documents).await?;
        state.built = true;

        // The in-memory index stays usable when the snapshot cannot be written
        if let Err(e) = state.index.persist().await {
            warn!(error = %e, "Failed to persist history index, serving from memory");
        }

        info!(
            conversations = stats.conversations,
            documents = stats.documents,
            embedder = self.embedder.name(),
            "History index built"
        );
        Ok(stats)
    }

    async fn search_built(
        &self,
        index: &dyn VectorIndex,
        query: &str,
        k: usize,
    ) -> Result<Vec<ScoredResult>, IndexError> {
        let total = index.count().await?;
        if total == 0 {
            debug!("History index is empty");
            return Ok(Vec::new());
        }

        let query_vector = self.embedder.embed(query).await?;
        let neighbors = index.nearest_neighbors(&query_vector, k.min(total)).await?;

        let mut seen = HashSet::new();
        let mut results: Vec<ScoredResult> = neighbors
            .into_iter()
            .filter(|doc| seen.insert(doc.content.clone()))
            .map(|doc| ScoredResult {
                similarity: cosine_similarity(&query_vector, &doc.embedding),
                token_count: self.tokenizer.count(&doc.content),
                content: doc.content,
                metadata: doc.metadata,
            })
            .collect();

        results.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        debug!(k, returned = results.len(), "History search complete");
        Ok(results)
    }
}
