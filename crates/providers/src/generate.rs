//! Hosted `/generate` text-generation endpoint.
//!
//! Request: `{hf_name, message, max_length, max_new_tokens, temperature,
//! do_sample, num_beams, history}`. Response: `{response}`.

use async_trait::async_trait;
use contextor_core::error::ProviderError;
use contextor_core::provider::{LanguageModel, SamplingParams};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::http;

const DEFAULT_NUM_BEAMS: u32 = 4;

pub struct GenerateEndpointModel {
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl GenerateEndpointModel {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            client: http::client(timeout_secs)?,
        })
    }

    fn request_body<'a>(&'a self, prompt: &'a str, params: &SamplingParams) -> GenerateRequest<'a> {
        let prompt_chars = prompt.chars().count() as u32;
        GenerateRequest {
            hf_name: &self.model,
            message: prompt,
            max_length: params
                .max_length
                .unwrap_or(params.max_new_tokens.saturating_add(prompt_chars)),
            max_new_tokens: params.max_new_tokens,
            temperature: params.temperature,
            do_sample: params.temperature > 0.0,
            num_beams: params.num_beams.unwrap_or(DEFAULT_NUM_BEAMS),
            history: Vec::new(),
        }
    }
}

#[async_trait]
impl LanguageModel for GenerateEndpointModel {
    fn name(&self) -> &str {
        "generate"
    }

    async fn generate(
        &self,
        prompt: &str,
        params: &SamplingParams,
    ) -> Result<String, ProviderError> {
        let url = format!("{}/generate", self.base_url);
        let body = self.request_body(prompt, params);

        debug!(model = %self.model, max_new_tokens = body.max_new_tokens, "Sending generate request");

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(http::send_error)?;
        let response = http::check_status(response, self.name()).await?;

        let text = response.text().await.map_err(http::send_error)?;
        // Some deployments answer with a bare string instead of {response}
        match serde_json::from_str::<GenerateResponse>(&text) {
            Ok(parsed) => Ok(parsed.response.trim().to_string()),
            Err(_) if !text.trim_start().starts_with('{') => Ok(text.trim().to_string()),
            Err(e) => Err(ProviderError::MalformedResponse(format!(
                "generate response: {e}"
            ))),
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    hf_name: &'a str,
    message: &'a str,
    max_length: u32,
    max_new_tokens: u32,
    temperature: f32,
    do_sample: bool,
    num_beams: u32,
    history: Vec<serde_json::Value>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}
