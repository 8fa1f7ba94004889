//! Budgeted context assembly.
//!
//! Given a query, the assembler decides which sources to consult, retrieves
//! from them concurrently, keeps as many top-ranked snippets as the token
//! budget allows, and wraps them around the query.
//!
//! # Budget split
//!
//! When both sources are requested, history may spend at most half of
//! `max_tokens`; web gets whatever history left unspent. Within a source the
//! first item that would overflow ends selection for that source.

use std::collections::BTreeSet;
use std::sync::Arc;

use contextor_core::error::AssemblyError;
use contextor_core::{
    AssembledContext, ClassificationDecision, ContextSource, DecisionOrigin, ScoredResult,
    WebSnippet,
};
use contextor_history::HistoryRetriever;
use contextor_web::WebRetriever;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::classifier::{Classification, QueryClassifier};
use crate::context::budget::take_within_budget;
use crate::context::format::{build_prompt, format_history, format_web};

/// How much each source is asked for before budgeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievalLimits {
    pub history_k: usize,
    pub web_results: usize,
    pub web_max_chars: usize,
}

impl Default for RetrievalLimits {
    fn default() -> Self {
        Self {
            history_k: 5,
            web_results: 3,
            web_max_chars: 800,
        }
    }
}

pub struct ContextAssembler {
    classifier: QueryClassifier,
    history: Arc<HistoryRetriever>,
    web: Option<WebRetriever>,
    limits: RetrievalLimits,
}

impl ContextAssembler {
    /// `web` is `None` when web search is disabled; web requests are then
    /// treated as not needed.
    pub fn new(
        classifier: QueryClassifier,
        history: Arc<HistoryRetriever>,
        web: Option<WebRetriever>,
        limits: RetrievalLimits,
    ) -> Self {
        Self {
            classifier,
            history,
            web,
            limits,
        }
    }

    pub fn classifier(&self) -> &QueryClassifier {
        &self.classifier
    }

    /// Classify `query`, then assemble.
    pub async fn assemble(
        &self,
        query: &str,
        max_tokens: usize,
        min_similarity: f32,
    ) -> Result<AssembledContext, AssemblyError> {
        check_similarity(min_similarity)?;
        let classification = self.classifier.classify(query).await;
        self.assemble_classified(query, classification, max_tokens, min_similarity)
            .await
    }

    /// Assemble with a caller-supplied decision, skipping classification.
    pub async fn assemble_with(
        &self,
        query: &str,
        decision: ClassificationDecision,
        max_tokens: usize,
        min_similarity: f32,
    ) -> Result<AssembledContext, AssemblyError> {
        check_similarity(min_similarity)?;
        let classification = Classification {
            decision,
            origin: DecisionOrigin::Explicit,
        };
        self.assemble_classified(query, classification, max_tokens, min_similarity)
            .await
    }

    async fn assemble_classified(
        &self,
        query: &str,
        classification: Classification,
        max_tokens: usize,
        min_similarity: f32,
    ) -> Result<AssembledContext, AssemblyError> {
        let decision = classification.decision;
        let web = self.web.as_ref().filter(|_| decision.needs_web_search);
        if decision.needs_web_search && web.is_none() {
            debug!("Web search requested but disabled");
        }

        let (history_results, web_snippets) = tokio::join!(
            self.retrieve_history(query, decision.needs_chat_history),
            self.retrieve_web(query, web),
        );

        let history_budget = if web.is_some() {
            max_tokens / 2
        } else {
            max_tokens
        };
        let relevant: Vec<ScoredResult> = history_results
            .into_iter()
            .filter(|r| r.similarity >= min_similarity)
            .collect();
        let history = take_within_budget("chat_history", relevant, history_budget, |r| r.token_count);

        let web_budget = max_tokens.saturating_sub(history.tokens);
        let web = take_within_budget("web_search", web_snippets, web_budget, |s| s.token_count);

        debug!(stats = ?history.stats, "History budget");
        debug!(stats = ?web.stats, "Web budget");

        let mut parts: Vec<String> = Vec::with_capacity(history.items.len() + web.items.len());
        let mut sources_used = BTreeSet::new();
        if !history.items.is_empty() {
            sources_used.insert(ContextSource::ChatHistory);
            parts.extend(history.items.iter().map(format_history));
        }
        if !web.items.is_empty() {
            sources_used.insert(ContextSource::WebSearch);
            parts.extend(web.items.iter().map(format_web));
        }

        let token_usage = history.tokens + web.tokens;
        debug!(
            origin = ?classification.origin,
            web = decision.needs_web_search,
            history = decision.needs_chat_history,
            parts = parts.len(),
            token_usage,
            max_tokens,
            "Context assembled"
        );

        Ok(AssembledContext {
            prompt: build_prompt(&parts, query),
            sources_used,
            token_usage,
            decision,
            decision_origin: classification.origin,
        })
    }

    async fn retrieve_history(&self, query: &str, wanted: bool) -> Vec<ScoredResult> {
        if !wanted {
            return Vec::new();
        }
        match self.history.search(query, self.limits.history_k).await {
            Ok(results) => results,
            Err(e) => {
                warn!(error = %e, "History retrieval failed, continuing without it");
                Vec::new()
            }
        }
    }

    async fn retrieve_web(&self, query: &str, web: Option<&WebRetriever>) -> Vec<WebSnippet> {
        match web {
            Some(web) => {
                web.gather(query, self.limits.web_results, self.limits.web_max_chars)
                    .await
            }
            None => Vec::new(),
        }
    }
}

fn check_similarity(min_similarity: f32) -> Result<(), AssemblyError> {
    if min_similarity.is_nan() || !(-1.0..=1.0).contains(&min_similarity) {
        return Err(AssemblyError::InvalidArgument(format!(
            "min_similarity must be within [-1, 1], got {min_similarity}"
        )));
    }
    Ok(())
}
