//! # Contextor Core
//!
//! Domain types, collaborator traits, and error definitions for the
//! Contextor prompt augmentation pipeline. This crate has **zero framework
//! dependencies**: it defines the model that every other crate implements
//! against.
//!
//! ## Design Philosophy
//!
//! Every external collaborator (embedding backend, vector index, chat-log
//! store, language model, web search, page fetcher, tokenizer) is a trait
//! here. Implementations live in their respective crates, which keeps the
//! pipeline testable with in-process stand-ins.

pub mod chunk;
pub mod context;
pub mod error;
pub mod index;
pub mod message;
pub mod provider;
pub mod retrieval;
pub mod text;
pub mod token;
pub mod web;

// Re-export key types at crate root for ergonomics
pub use chunk::{Chunk, ChunkKind};
pub use context::{AssembledContext, ClassificationDecision, ContextSource, DecisionOrigin};
pub use error::{Error, Result};
pub use index::{ConversationStore, VectorIndex};
pub use message::{Conversation, Message, Role};
pub use provider::{Embedder, LanguageModel, SamplingParams};
pub use retrieval::{DocumentMetadata, IndexedDocument, ScoredResult, WebResult, WebSnippet};
pub use token::{HeuristicTokenizer, Tokenizer};
pub use web::{PageFetcher, WebSearch};
