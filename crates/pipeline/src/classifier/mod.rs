//! Query classification: which context sources does a query need?
//!
//! The configured language model is asked for a two-field JSON verdict. Any
//! failure on that path (no model, timeout, HTTP error, reply without a JSON
//! object) falls back to deterministic keyword rules, so classification
//! itself never fails.

pub mod json_extract;
pub mod rules;

use std::sync::Arc;
use std::time::Duration;

use contextor_core::{ClassificationDecision, DecisionOrigin, LanguageModel, SamplingParams};
use serde::Serialize;
use tracing::{debug, warn};

use json_extract::first_json_object;
use rules::fallback_decision;

/// A decision plus where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub decision: ClassificationDecision,
    pub origin: DecisionOrigin,
}

pub struct QueryClassifier {
    model: Option<Arc<dyn LanguageModel>>,
    timeout: Duration,
    params: SamplingParams,
}

impl QueryClassifier {
    pub fn new(model: Option<Arc<dyn LanguageModel>>, timeout: Duration) -> Self {
        Self {
            model,
            timeout,
            params: SamplingParams {
                temperature: 0.1,
                max_new_tokens: 50,
                max_length: Some(200),
                num_beams: Some(2),
            },
        }
    }

    /// Keyword rules only.
    pub fn rules_only() -> Self {
        Self::new(None, Duration::from_secs(15))
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.params.temperature = temperature;
        self
    }

    pub async fn classify(&self, query: &str) -> Classification {
        let Some(model) = &self.model else {
            return Self::fallback(query, None);
        };

        let prompt = classification_prompt(query);
        let reply = match tokio::time::timeout(self.timeout, model.generate(&prompt, &self.params)).await {
            Ok(Ok(reply)) => reply,
            Ok(Err(e)) => {
                warn!(model = model.name(), error = %e, "Classification request failed, using keyword rules");
                return Self::fallback(query, None);
            }
            Err(_) => {
                warn!(model = model.name(), timeout_secs = self.timeout.as_secs(), "Classification timed out, using keyword rules");
                return Self::fallback(query, None);
            }
        };

        match first_json_object(&reply) {
            Some(verdict) => {
                let flag = |key: &str| verdict.get(key).and_then(|v| v.as_bool()).unwrap_or(false);
                let decision =
                    ClassificationDecision::new(flag("needs_web_search"), flag("needs_chat_history"));
                debug!(?decision, "Query classified by model");
                Classification {
                    decision,
                    origin: DecisionOrigin::Model,
                }
            }
            None => {
                debug!(reply = %reply, "Model reply had no JSON verdict");
                Self::fallback(query, Some(&reply))
            }
        }
    }

    fn fallback(query: &str, reply: Option<&str>) -> Classification {
        let decision = fallback_decision(query, reply);
        debug!(?decision, "Query classified by keyword rules");
        Classification {
            decision,
            origin: DecisionOrigin::Fallback,
        }
    }
}

/// The instruction sent to the model.
pub fn classification_prompt(query: &str) -> String {
    format!(
        r#"Analyze this user query and determine what information sources are needed. Consider:
- Does this need current/real-time information from the internet? (news, weather, stock prices, recent events, etc.)
- Does this reference previous conversations or personal context, or context that is likely building on a prior conversation?
- Is this a general knowledge question that doesn't need additional context?
Respond with only this JSON format: {{"needs_web_search": true/false, "needs_chat_history": true/false}}

Query: "{query}"
"#
    )
}
