//! Search plus concurrent page scraping.
//!
//! Upstream failures never escape: a failed search yields no results and a
//! failed page falls back to the search snippet.

use std::sync::Arc;

use contextor_config::WebConfig;
use contextor_core::error::WebError;
use contextor_core::{PageFetcher, Tokenizer, WebResult, WebSearch, WebSnippet};
use futures::future::join_all;
use tracing::{debug, warn};

use crate::extract::extract_text;
use crate::fetch::HttpPageFetcher;
use crate::search::DuckDuckGoSearch;

pub struct WebRetriever {
    search: Arc<dyn WebSearch>,
    fetcher: Arc<dyn PageFetcher>,
    tokenizer: Arc<dyn Tokenizer>,
    paragraph_limit: usize,
}

impl WebRetriever {
    pub fn new(
        search: Arc<dyn WebSearch>,
        fetcher: Arc<dyn PageFetcher>,
        tokenizer: Arc<dyn Tokenizer>,
        paragraph_limit: usize,
    ) -> Self {
        Self {
            search,
            fetcher,
            tokenizer,
            paragraph_limit,
        }
    }

    /// DuckDuckGo search with an HTTP fetcher, both sharing the configured
    /// user agent and timeout.
    pub fn from_config(config: &WebConfig, tokenizer: Arc<dyn Tokenizer>) -> Result<Self, WebError> {
        let search = DuckDuckGoSearch::new(
            &config.search_url,
            &config.user_agent,
            config.fetch_timeout_secs,
        )?;
        let fetcher = HttpPageFetcher::new(&config.user_agent, config.fetch_timeout_secs)?;
        Ok(Self::new(
            Arc::new(search),
            Arc::new(fetcher),
            tokenizer,
            config.paragraph_limit,
        ))
    }

    /// Ranked search results; empty when the search backend fails.
    pub async fn search(&self, query: &str, max_results: usize) -> Vec<WebResult> {
        match self.search.search(query, max_results).await {
            Ok(results) => results,
            Err(e) => {
                warn!(backend = self.search.name(), error = %e, "Web search failed, continuing without results");
                Vec::new()
            }
        }
    }

    /// Readable text of the page at `url`, or `None` on any failure.
    pub async fn fetch(&self, url: &str, max_chars: usize) -> Option<String> {
        match self.fetcher.get(url).await {
            Ok(html) => extract_text(&html, max_chars, self.paragraph_limit),
            Err(e) => {
                debug!(url, error = %e, "Page fetch failed");
                None
            }
        }
    }

    /// Search, then scrape every result page concurrently. Snippets keep
    /// search rank order.
    pub async fn gather(&self, query: &str, max_results: usize, max_chars: usize) -> Vec<WebSnippet> {
        let results = self.search(query, max_results).await;
        if results.is_empty() {
            return Vec::new();
        }

        let pages = join_all(results.iter().map(|r| self.fetch(&r.url, max_chars))).await;

        results
            .into_iter()
            .zip(pages)
            .enumerate()
            .map(|(i, (result, page))| {
                let scraped = page.is_some();
                let content = page.unwrap_or(result.snippet);
                WebSnippet {
                    token_count: self.tokenizer.count(&content),
                    title: result.title,
                    url: result.url,
                    source: result.source,
                    content,
                    rank: i + 1,
                    scraped,
                }
            })
            .collect()
    }
}
