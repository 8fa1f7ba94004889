//! DuckDuckGo instant-answer search.

use std::time::Duration;

use async_trait::async_trait;
use contextor_core::error::WebError;
use contextor_core::text::truncate_chars;
use contextor_core::{WebResult, WebSearch};
use serde_json::Value;
use tracing::debug;

const TITLE_CHARS: usize = 100;
const SOURCE: &str = "duckduckgo";

pub struct DuckDuckGoSearch {
    endpoint: String,
    client: reqwest::Client,
}

impl DuckDuckGoSearch {
    pub fn new(
        endpoint: impl Into<String>,
        user_agent: &str,
        timeout_secs: u64,
    ) -> Result<Self, WebError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| WebError::SearchFailed(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }
}

/// Collect `{Text, FirstURL}` entries from `RelatedTopics`, descending into
/// grouped `Topics` arrays.
fn collect_topics(topics: &[Value], max_results: usize, out: &mut Vec<WebResult>) {
    for topic in topics {
        if out.len() >= max_results {
            return;
        }
        if let (Some(text), Some(url)) = (
            topic.get("Text").and_then(Value::as_str),
            topic.get("FirstURL").and_then(Value::as_str),
        ) {
            out.push(WebResult {
                title: truncate_chars(text, TITLE_CHARS),
                url: url.to_string(),
                snippet: text.to_string(),
                source: SOURCE.to_string(),
            });
        } else if let Some(nested) = topic.get("Topics").and_then(Value::as_array) {
            collect_topics(nested, max_results, out);
        }
    }
}

pub(crate) fn parse_results(body: &str, max_results: usize) -> Result<Vec<WebResult>, WebError> {
    let payload: Value =
        serde_json::from_str(body).map_err(|e| WebError::MalformedPayload(e.to_string()))?;
    let mut results = Vec::new();
    if let Some(topics) = payload.get("RelatedTopics").and_then(Value::as_array) {
        collect_topics(topics, max_results, &mut results);
    }
    Ok(results)
}

#[async_trait]
impl WebSearch for DuckDuckGoSearch {
    fn name(&self) -> &str {
        SOURCE
    }

    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<WebResult>, WebError> {
        if max_results == 0 {
            return Ok(Vec::new());
        }

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ])
            .send()
            .await
            .map_err(|e| WebError::SearchFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WebError::Status {
                url: self.endpoint.clone(),
                status: status.as_u16(),
            });
        }

        // The endpoint labels its JSON as javascript, so parse the text body
        let body = response
            .text()
            .await
            .map_err(|e| WebError::SearchFailed(e.to_string()))?;
        let results = parse_results(&body, max_results)?;
        debug!(query, count = results.len(), "Web search complete");
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn payload() -> Value {
        json!({
            "Abstract": "",
            "RelatedTopics": [
                { "Text": "Rust is a systems programming language", "FirstURL": "https://duckduckgo.com/Rust" },
                { "Name": "Games", "Topics": [
                    { "Text": "Rust (video game)", "FirstURL": "https://duckduckgo.com/Rust_game" }
                ]},
                { "Text": "missing url" },
                { "Text": "x".repeat(150), "FirstURL": "https://example.com/long" }
            ]
        })
    }

    #[test]
    fn flattens_nested_topics_and_skips_incomplete() {
        let results = parse_results(&payload().to_string(), 10).unwrap();
        let urls: Vec<_> = results.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://duckduckgo.com/Rust",
                "https://duckduckgo.com/Rust_game",
                "https://example.com/long"
            ]
        );
        assert!(results.iter().all(|r| r.source == "duckduckgo"));
    }

    #[test]
    fn long_titles_are_truncated() {
        let results = parse_results(&payload().to_string(), 10).unwrap();
        let long = &results[2];
        assert_eq!(long.title.chars().count(), 103);
        assert!(long.title.ends_with("..."));
        assert_eq!(long.snippet.len(), 150);
    }

    #[test]
    fn respects_max_results() {
        assert_eq!(parse_results(&payload().to_string(), 1).unwrap().len(), 1);
    }

    #[test]
    fn garbage_is_malformed() {
        assert!(matches!(
            parse_results("<html>", 3),
            Err(WebError::MalformedPayload(_))
        ));
    }

    #[tokio::test]
    async fn sends_instant_answer_params() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("q", "rust lang"))
            .and(query_param("format", "json"))
            .and(query_param("no_html", "1"))
            .and(query_param("skip_disambig", "1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(payload().to_string())
                    .insert_header("content-type", "application/x-javascript"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let search = DuckDuckGoSearch::new(server.uri(), "test-agent", 5).unwrap();
        let results = search.search("rust lang", 2).await.unwrap();
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn non_success_status_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let search = DuckDuckGoSearch::new(server.uri(), "test-agent", 5).unwrap();
        let err = search.search("q", 3).await.unwrap_err();
        assert!(matches!(err, WebError::Status { status: 503, .. }));
    }
}
