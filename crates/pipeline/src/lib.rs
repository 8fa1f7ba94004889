//! # Contextor Pipeline
//!
//! Wires configuration into a running query-augmentation pipeline:
//!
//! ```text
//! query ──► QueryClassifier ──► { HistoryRetriever ∥ WebRetriever } ──► budget ──► prompt
//! ```
//!
//! [`Pipeline::from_config`] builds every collaborator from an
//! [`AppConfig`]; [`Pipeline::new`] accepts pre-built parts for tests and
//! embedders with custom backends.

pub mod classifier;
pub mod context;

#[cfg(test)]
pub(crate) mod test_helpers;

use std::sync::Arc;
use std::time::Duration;

use contextor_chunker::{ChunkStrategy, Chunker, ChunkerConfig};
use contextor_config::{AppConfig, AssemblerConfig, ChunkingConfig};
use contextor_core::error::{AssemblyError, IndexError};
use contextor_core::{
    AssembledContext, ClassificationDecision, ConversationStore, HeuristicTokenizer, Tokenizer,
    VectorIndex,
};
use contextor_history::{BuildStats, HistoryRetriever, InMemoryVectorIndex, IndexStatus, JsonDirStore};
use contextor_providers::{build_embedder, build_language_model};
use contextor_web::WebRetriever;
use tracing::info;

pub use classifier::{Classification, QueryClassifier};
pub use context::{ContextAssembler, RetrievalLimits};

/// Chunker limits from the `[chunking]` config section.
pub fn chunker_config(config: &ChunkingConfig) -> ChunkerConfig {
    ChunkerConfig {
        max_chunk_size: config.max_chunk_size,
        overlap_size: config.overlap_size,
        turns_per_chunk: config.turns_per_chunk,
        time_window_hours: config.time_window_hours,
    }
}

pub struct Pipeline {
    assembler: ContextAssembler,
    history: Arc<HistoryRetriever>,
    defaults: AssemblerConfig,
}

impl Pipeline {
    pub fn new(assembler: ContextAssembler, history: Arc<HistoryRetriever>, defaults: AssemblerConfig) -> Self {
        Self {
            assembler,
            history,
            defaults,
        }
    }

    /// Build the pipeline described by `config`. Nothing is contacted
    /// here; the history index is built on first use.
    pub fn from_config(config: &AppConfig) -> contextor_core::Result<Self> {
        config
            .validate()
            .map_err(|e| contextor_core::Error::Config { message: e.to_string() })?;

        let tokenizer: Arc<dyn Tokenizer> = Arc::new(HeuristicTokenizer);
        let embedder = build_embedder(&config.embedding)?;
        let model = build_language_model(&config.llm)?;

        let store: Arc<dyn ConversationStore> = Arc::new(JsonDirStore::new(config.store.chat_dir.clone()));
        let index: Box<dyn VectorIndex> = match &config.store.index_path {
            Some(path) => Box::new(InMemoryVectorIndex::persistent(path.clone())),
            None => Box::new(InMemoryVectorIndex::new()),
        };
        let chunker = Chunker::new(chunker_config(&config.chunking))?;

        let history = Arc::new(HistoryRetriever::new(
            store,
            embedder,
            tokenizer.clone(),
            index,
            chunker,
            config.chunking.strategy,
        ));

        let web = if config.web.enabled {
            Some(WebRetriever::from_config(&config.web, tokenizer)?)
        } else {
            None
        };

        let classifier = QueryClassifier::new(
            model,
            Duration::from_secs(config.llm.classify_timeout_secs),
        )
        .with_temperature(config.llm.classify_temperature);

        let limits = RetrievalLimits {
            history_k: config.retrieval.history_k,
            web_results: config.retrieval.web_results,
            web_max_chars: config.retrieval.web_max_chars,
        };

        info!(
            chat_dir = %config.store.chat_dir.display(),
            strategy = %config.chunking.strategy,
            llm = ?config.llm.kind,
            web = config.web.enabled,
            "Pipeline ready"
        );

        Ok(Self::new(
            ContextAssembler::new(classifier, history.clone(), web, limits),
            history,
            config.assembler.clone(),
        ))
    }

    pub async fn assemble(
        &self,
        query: &str,
        max_tokens: usize,
        min_similarity: f32,
    ) -> Result<AssembledContext, AssemblyError> {
        self.assembler.assemble(query, max_tokens, min_similarity).await
    }

    /// Assemble with the configured token budget and similarity floor.
    pub async fn assemble_default(&self, query: &str) -> Result<AssembledContext, AssemblyError> {
        self.assemble(query, self.defaults.max_tokens, self.defaults.min_similarity)
            .await
    }

    pub async fn assemble_with(
        &self,
        query: &str,
        decision: ClassificationDecision,
        max_tokens: usize,
        min_similarity: f32,
    ) -> Result<AssembledContext, AssemblyError> {
        self.assembler
            .assemble_with(query, decision, max_tokens, min_similarity)
            .await
    }

    pub async fn classify(&self, query: &str) -> Classification {
        self.assembler.classifier().classify(query).await
    }

    pub async fn rebuild_index(&self) -> Result<BuildStats, IndexError> {
        self.history.rebuild_index().await
    }

    pub async fn status(&self) -> Result<IndexStatus, IndexError> {
        self.history.status().await
    }

    pub fn defaults(&self) -> &AssemblerConfig {
        &self.defaults
    }
}

/// Store and chunker for offline inspection of the corpus, built the same
/// way the pipeline builds them.
pub fn corpus_tools(
    config: &AppConfig,
) -> contextor_core::Result<(JsonDirStore, Chunker, ChunkStrategy)> {
    let chunker = Chunker::new(chunker_config(&config.chunking))?;
    Ok((
        JsonDirStore::new(config.store.chat_dir.clone()),
        chunker,
        config.chunking.strategy,
    ))
}
