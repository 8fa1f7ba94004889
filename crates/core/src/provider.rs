//! Provider traits: the abstraction over language-model and embedding
//! backends.
//!
//! The classifier only needs `generate(prompt) -> text`; the history index
//! only needs text → vector. Implementations: OpenAI-compatible endpoints,
//! a plain `/generate` endpoint, and a deterministic hashing embedder.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// Sampling parameters for a generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplingParams {
    /// Temperature (0.0 = deterministic, 1.0 = creative)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default = "default_max_new_tokens")]
    pub max_new_tokens: u32,

    /// Total length cap (prompt + generation) for endpoints that take one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,

    /// Beam count for endpoints that support beam search
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_beams: Option<u32>,
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_new_tokens() -> u32 {
    256
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            max_new_tokens: default_max_new_tokens(),
            max_length: None,
            num_beams: None,
        }
    }
}

/// A text-in, text-out language model reachable over the network.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// A human-readable name (e.g., "openai", "generate").
    fn name(&self) -> &str;

    /// Generate a completion for `prompt`.
    async fn generate(
        &self,
        prompt: &str,
        params: &SamplingParams,
    ) -> std::result::Result<String, ProviderError>;
}

/// Turns text into vectors. Must be stable: the same text always yields
/// the same vector.
#[async_trait]
pub trait Embedder: Send + Sync {
    fn name(&self) -> &str;

    /// Embed a single query text.
    async fn embed(&self, text: &str) -> std::result::Result<Vec<f32>, ProviderError>;

    /// Embed a batch of documents. Default implementation embeds one by one.
    async fn embed_documents(
        &self,
        texts: &[String],
    ) -> std::result::Result<Vec<Vec<f32>>, ProviderError> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }
}
