//! Classification decisions and the assembled prompt.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Which context sources a query needs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationDecision {
    pub needs_web_search: bool,
    pub needs_chat_history: bool,
}

impl ClassificationDecision {
    pub fn new(needs_web_search: bool, needs_chat_history: bool) -> Self {
        Self {
            needs_web_search,
            needs_chat_history,
        }
    }

    /// Neither source requested.
    pub fn none() -> Self {
        Self::default()
    }
}

/// Where a classification came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionOrigin {
    /// Parsed from the language model's reply
    Model,
    /// Keyword rules
    Fallback,
    /// Supplied by the caller
    Explicit,
}

/// A context source that can contribute snippets to a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextSource {
    ChatHistory,
    WebSearch,
}

impl ContextSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContextSource::ChatHistory => "chat_history",
            ContextSource::WebSearch => "web_search",
        }
    }
}

/// Terminal output of the pipeline for one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssembledContext {
    /// The augmented prompt, or the bare query when nothing qualified
    pub prompt: String,
    /// Sources that actually contributed, not merely requested
    pub sources_used: BTreeSet<ContextSource>,
    /// Tokens consumed by included snippets
    pub token_usage: usize,
    /// The decision that drove retrieval
    pub decision: ClassificationDecision,
    pub decision_origin: DecisionOrigin,
}
