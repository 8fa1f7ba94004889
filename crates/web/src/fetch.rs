//! Plain HTTP page fetcher.

use std::time::Duration;

use async_trait::async_trait;
use contextor_core::PageFetcher;
use contextor_core::error::WebError;

pub struct HttpPageFetcher {
    client: reqwest::Client,
}

impl HttpPageFetcher {
    pub fn new(user_agent: &str, timeout_secs: u64) -> Result<Self, WebError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| WebError::FetchFailed {
                url: String::new(),
                reason: format!("failed to create HTTP client: {e}"),
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn get(&self, url: &str) -> Result<String, WebError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| WebError::FetchFailed {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(WebError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| WebError::FetchFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn sends_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .and(header("user-agent", "contextor-test"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<p>hi</p>"))
            .mount(&server)
            .await;

        let fetcher = HttpPageFetcher::new("contextor-test", 5).unwrap();
        let body = fetcher.get(&format!("{}/page", server.uri())).await.unwrap();
        assert_eq!(body, "<p>hi</p>");
    }

    #[tokio::test]
    async fn http_errors_are_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = HttpPageFetcher::new("contextor-test", 5).unwrap();
        let err = fetcher.get(&format!("{}/gone", server.uri())).await.unwrap_err();
        assert!(matches!(err, WebError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn slow_pages_time_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_delay(std::time::Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let fetcher = HttpPageFetcher::new("contextor-test", 1).unwrap();
        let err = fetcher.get(&server.uri()).await.unwrap_err();
        assert!(matches!(err, WebError::FetchFailed { .. }));
    }
}
