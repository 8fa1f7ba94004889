//! Shared test doubles for pipeline tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use contextor_core::error::{ProviderError, WebError};
use contextor_core::{Embedder, LanguageModel, PageFetcher, SamplingParams, WebResult, WebSearch};

/// Returns scripted replies in order, recording every prompt.
///
/// Panics if more calls are made than replies provided.
pub struct ScriptedModel {
    replies: Mutex<Vec<String>>,
    calls: Mutex<Vec<(String, SamplingParams)>>,
}

impl ScriptedModel {
    pub fn new(replies: Vec<&str>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().rev().map(String::from).collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, SamplingParams)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, prompt: &str, params: &SamplingParams) -> Result<String, ProviderError> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), params.clone()));
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop()
            .expect("ScriptedModel: no more replies");
        Ok(reply)
    }
}

/// Always fails with a network error.
pub struct FailingModel;

#[async_trait]
impl LanguageModel for FailingModel {
    fn name(&self) -> &str {
        "failing"
    }

    async fn generate(&self, _prompt: &str, _params: &SamplingParams) -> Result<String, ProviderError> {
        Err(ProviderError::Network("connection refused".into()))
    }
}

/// Sleeps before answering.
pub struct SlowModel(pub Duration);

#[async_trait]
impl LanguageModel for SlowModel {
    fn name(&self) -> &str {
        "slow"
    }

    async fn generate(&self, _prompt: &str, _params: &SamplingParams) -> Result<String, ProviderError> {
        tokio::time::sleep(self.0).await;
        Ok(r#"{"needs_web_search": true, "needs_chat_history": true}"#.into())
    }
}

/// Maps exact texts to fixed vectors; anything else embeds to `fallback`.
pub struct FixedEmbedder {
    vectors: HashMap<String, Vec<f32>>,
    fallback: Vec<f32>,
}

impl FixedEmbedder {
    pub fn new(fallback: Vec<f32>) -> Self {
        Self {
            vectors: HashMap::new(),
            fallback,
        }
    }

    pub fn with(mut self, text: impl Into<String>, vector: Vec<f32>) -> Self {
        self.vectors.insert(text.into(), vector);
        self
    }
}

#[async_trait]
impl Embedder for FixedEmbedder {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        Ok(self
            .vectors
            .get(text)
            .cloned()
            .unwrap_or_else(|| self.fallback.clone()))
    }
}

/// Returns the same results for every query.
pub struct StaticSearch(pub Vec<WebResult>);

#[async_trait]
impl WebSearch for StaticSearch {
    fn name(&self) -> &str {
        "static"
    }

    async fn search(&self, _query: &str, max_results: usize) -> Result<Vec<WebResult>, WebError> {
        Ok(self.0.iter().take(max_results).cloned().collect())
    }
}

/// Serves pages from a map; unknown URLs fail.
pub struct MapFetcher(pub HashMap<String, String>);

#[async_trait]
impl PageFetcher for MapFetcher {
    async fn get(&self, url: &str) -> Result<String, WebError> {
        self.0.get(url).cloned().ok_or_else(|| WebError::FetchFailed {
            url: url.to_string(),
            reason: "not served".into(),
        })
    }
}

pub fn web_result(n: usize, snippet: &str) -> WebResult {
    WebResult {
        title: format!("Result {n}"),
        url: format!("https://example.com/{n}"),
        snippet: snippet.to_string(),
        source: "duckduckgo".into(),
    }
}
