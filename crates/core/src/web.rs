//! Web search and page fetch contracts.

use async_trait::async_trait;

use crate::error::WebError;
use crate::retrieval::WebResult;

/// An external search endpoint returning ranked results.
#[async_trait]
pub trait WebSearch: Send + Sync {
    fn name(&self) -> &str;

    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<WebResult>, WebError>;
}

/// Retrieves raw page HTML.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn get(&self, url: &str) -> Result<String, WebError>;
}
