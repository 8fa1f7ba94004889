//! Chat history retrieval for Contextor.
//!
//! - [`JsonDirStore`] enumerates stored conversations
//! - [`builder`] chunks them into index documents
//! - [`InMemoryVectorIndex`] holds the embedded documents
//! - [`HistoryRetriever`] answers similarity queries, building the index on
//!   first use

pub mod builder;
pub mod index;
pub mod retriever;
pub mod store;
pub mod vector;

pub use index::InMemoryVectorIndex;
pub use retriever::{BuildStats, HistoryRetriever, IndexStatus};
pub use store::{JsonDirStore, MemoryStore};
pub use vector::cosine_similarity;
