//! # Contextor Chunker
//!
//! Splits conversations into [`Chunk`]s before they are embedded. Each
//! strategy is a pure function of the conversation and the
//! [`ChunkerConfig`]; the only runtime failure is a temporal split over
//! messages that carry no timestamp.
//!
//! ```text
//! Conversation ──► Chunker::chunk(strategy) ──► Vec<Chunk> ──► embed ──► index
//! ```

mod intent;
mod keywords;
mod semantic;
mod sliding;
mod temporal;
mod text;
mod topic;
mod turn;

use contextor_core::error::ChunkError;
use contextor_core::{Chunk, Conversation};
use serde::{Deserialize, Serialize};

pub use contextor_core::ChunkKind as ChunkStrategy;
pub use keywords::{top_keywords, topic_label};
pub use text::render_messages;

/// Size and grouping limits shared by all strategies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkerConfig {
    /// Window width in characters for sliding-window chunks
    pub max_chunk_size: usize,

    /// Characters repeated between consecutive windows
    pub overlap_size: usize,

    /// Complete user/assistant turns per turn chunk
    pub turns_per_chunk: usize,

    /// Width of a temporal window
    pub time_window_hours: u32,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            max_chunk_size: 2000,
            overlap_size: 200,
            turns_per_chunk: 10,
            time_window_hours: 24,
        }
    }
}

impl ChunkerConfig {
    pub fn validate(&self) -> Result<(), ChunkError> {
        if self.max_chunk_size == 0 {
            return Err(ChunkError::InvalidConfig(
                "max_chunk_size must be greater than zero".into(),
            ));
        }
        if self.overlap_size >= self.max_chunk_size {
            return Err(ChunkError::InvalidConfig(format!(
                "overlap_size ({}) must be smaller than max_chunk_size ({})",
                self.overlap_size, self.max_chunk_size
            )));
        }
        if self.turns_per_chunk == 0 {
            return Err(ChunkError::InvalidConfig(
                "turns_per_chunk must be greater than zero".into(),
            ));
        }
        if self.time_window_hours == 0 {
            return Err(ChunkError::InvalidConfig(
                "time_window_hours must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

/// Segments conversations with a caller-selected strategy.
#[derive(Debug)]
pub struct Chunker {
    config: ChunkerConfig,
    intents: intent::IntentPatterns,
}

impl Chunker {
    /// Validate `config` and compile the intent patterns.
    pub fn new(config: ChunkerConfig) -> Result<Self, ChunkError> {
        config.validate()?;
        let intents = intent::IntentPatterns::compile()?;
        Ok(Self { config, intents })
    }

    pub fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    /// Chunk every conversation in order. Empty conversations yield nothing.
    pub fn chunk(
        &self,
        strategy: ChunkStrategy,
        conversations: &[Conversation],
    ) -> Result<Vec<Chunk>, ChunkError> {
        let mut chunks = Vec::new();
        for conversation in conversations {
            chunks.extend(self.chunk_conversation(strategy, conversation)?);
        }
        tracing::debug!(
            strategy = %strategy,
            conversations = conversations.len(),
            chunks = chunks.len(),
            "Chunked conversations"
        );
        Ok(chunks)
    }

    /// Chunk a single conversation.
    pub fn chunk_conversation(
        &self,
        strategy: ChunkStrategy,
        conversation: &Conversation,
    ) -> Result<Vec<Chunk>, ChunkError> {
        if conversation.is_empty() {
            return Ok(Vec::new());
        }

        let chunks = match strategy {
            ChunkStrategy::Temporal => {
                temporal::chunk(conversation, self.config.time_window_hours)?
            }
            ChunkStrategy::Topic => topic::chunk(conversation),
            ChunkStrategy::SlidingWindow => sliding::chunk(
                conversation,
                self.config.max_chunk_size,
                self.config.overlap_size,
            ),
            ChunkStrategy::Turn => turn::chunk(conversation, self.config.turns_per_chunk),
            ChunkStrategy::Semantic => semantic::chunk(conversation),
            ChunkStrategy::Intent => intent::chunk(conversation, &self.intents),
        };
        Ok(chunks)
    }
}
