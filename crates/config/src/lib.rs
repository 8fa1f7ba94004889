//! Configuration loading, validation, and management for Contextor.
//!
//! Loads configuration from `~/.contextor/config.toml` with environment
//! variable overrides. Validates all settings at load time so that invalid
//! budgets or chunk geometry fail before the first query.

use contextor_core::ChunkKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.contextor/config.toml`. One `AppConfig` is loaded
/// per process and handed to the pipeline by reference.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Language model used for query classification
    #[serde(default)]
    pub llm: LlmConfig,

    /// Embedding backend for the history index
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Chat-log store and index persistence
    #[serde(default)]
    pub store: StoreConfig,

    /// How conversations are split before indexing
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// Per-source candidate limits
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Web search and page fetching
    #[serde(default)]
    pub web: WebConfig,

    /// Default budget for assembled prompts
    #[serde(default)]
    pub assembler: AssemblerConfig,
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

// ── LLM ───────────────────────────────────────────────────────────────────

/// Which wire protocol the language model speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LlmKind {
    /// `POST {base_url}/chat/completions`
    OpenaiCompat,
    /// `POST {base_url}/generate` with `{hf_name, message, ...}`
    #[default]
    Generate,
    /// No model; classification always uses keyword rules
    None,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub kind: LlmKind,

    #[serde(default = "default_llm_url")]
    pub base_url: String,

    #[serde(default = "default_llm_model")]
    pub model: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// HTTP client timeout for every model request
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,

    /// Upper bound on a classification round trip
    #[serde(default = "default_classify_timeout")]
    pub classify_timeout_secs: u64,

    #[serde(default = "default_classify_temperature")]
    pub classify_temperature: f32,
}

fn default_llm_url() -> String {
    "https://smartnodes.ddns.net/tensorlink-api".into()
}
fn default_llm_model() -> String {
    "Qwen/Qwen2.5-7B-Instruct".into()
}
fn default_llm_timeout() -> u64 {
    30
}
fn default_classify_timeout() -> u64 {
    15
}
fn default_classify_temperature() -> f32 {
    0.1
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            kind: LlmKind::default(),
            base_url: default_llm_url(),
            model: default_llm_model(),
            api_key: None,
            timeout_secs: default_llm_timeout(),
            classify_timeout_secs: default_classify_timeout(),
            classify_temperature: default_classify_temperature(),
        }
    }
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("kind", &self.kind)
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &redact(&self.api_key))
            .field("timeout_secs", &self.timeout_secs)
            .field("classify_timeout_secs", &self.classify_timeout_secs)
            .field("classify_temperature", &self.classify_temperature)
            .finish()
    }
}

// ── Embeddings ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingProviderKind {
    /// Deterministic feature hashing, no network
    #[default]
    Hash,
    /// `POST {base_url}/embeddings`
    OpenaiCompat,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    #[serde(default)]
    pub provider: EmbeddingProviderKind,

    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Vector width for the hashing embedder
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,

    #[serde(default = "default_embedding_url")]
    pub base_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".into()
}
fn default_dimensions() -> usize {
    384
}
fn default_embedding_url() -> String {
    "https://api.openai.com/v1".into()
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProviderKind::default(),
            model: default_embedding_model(),
            dimensions: default_dimensions(),
            base_url: default_embedding_url(),
            api_key: None,
            timeout_secs: default_llm_timeout(),
        }
    }
}

impl std::fmt::Debug for EmbeddingConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("dimensions", &self.dimensions)
            .field("base_url", &self.base_url)
            .field("api_key", &redact(&self.api_key))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

// ── Store ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory of `*.json` chat logs
    #[serde(default = "default_chat_dir")]
    pub chat_dir: PathBuf,

    /// Where the vector index is persisted; `None` keeps it in memory only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_path: Option<PathBuf>,
}

fn default_chat_dir() -> PathBuf {
    dirs_home().join("localhostGPT")
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            chat_dir: default_chat_dir(),
            index_path: Some(AppConfig::config_dir().join("index.json")),
        }
    }
}

// ── Chunking ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Strategy used when building the history index
    #[serde(default = "default_strategy")]
    pub strategy: ChunkKind,

    #[serde(default = "default_max_chunk_size")]
    pub max_chunk_size: usize,

    #[serde(default = "default_overlap_size")]
    pub overlap_size: usize,

    #[serde(default = "default_turns_per_chunk")]
    pub turns_per_chunk: usize,

    #[serde(default = "default_time_window_hours")]
    pub time_window_hours: u32,
}

fn default_strategy() -> ChunkKind {
    ChunkKind::SlidingWindow
}
fn default_max_chunk_size() -> usize {
    2000
}
fn default_overlap_size() -> usize {
    200
}
fn default_turns_per_chunk() -> usize {
    10
}
fn default_time_window_hours() -> u32 {
    24
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            strategy: default_strategy(),
            max_chunk_size: default_max_chunk_size(),
            overlap_size: default_overlap_size(),
            turns_per_chunk: default_turns_per_chunk(),
            time_window_hours: default_time_window_hours(),
        }
    }
}

// ── Retrieval ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// History candidates requested per query
    #[serde(default = "default_history_k")]
    pub history_k: usize,

    /// Web results requested per query
    #[serde(default = "default_web_results")]
    pub web_results: usize,

    /// Characters scraped per web page
    #[serde(default = "default_web_max_chars")]
    pub web_max_chars: usize,
}

fn default_history_k() -> usize {
    5
}
fn default_web_results() -> usize {
    3
}
fn default_web_max_chars() -> usize {
    800
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            history_k: default_history_k(),
            web_results: default_web_results(),
            web_max_chars: default_web_max_chars(),
        }
    }
}

// ── Web ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_search_url")]
    pub search_url: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,

    /// Paragraphs taken when a page has no recognizable content container
    #[serde(default = "default_paragraph_limit")]
    pub paragraph_limit: usize,
}

fn default_true() -> bool {
    true
}
fn default_search_url() -> String {
    "https://api.duckduckgo.com/".into()
}
fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".into()
}
fn default_fetch_timeout() -> u64 {
    10
}
fn default_paragraph_limit() -> usize {
    5
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            search_url: default_search_url(),
            user_agent: default_user_agent(),
            fetch_timeout_secs: default_fetch_timeout(),
            paragraph_limit: default_paragraph_limit(),
        }
    }
}

// ── Assembler ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssemblerConfig {
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,

    #[serde(default = "default_min_similarity")]
    pub min_similarity: f32,
}

fn default_max_tokens() -> usize {
    2000
}
fn default_min_similarity() -> f32 {
    0.25
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            max_tokens: default_max_tokens(),
            min_similarity: default_min_similarity(),
        }
    }
}

// ── Loading ───────────────────────────────────────────────────────────────

impl AppConfig {
    /// Load configuration from the default path (~/.contextor/config.toml).
    ///
    /// Environment overrides:
    /// - `CONTEXTOR_API_KEY` (then `OPENAI_API_KEY`) when no key is configured
    /// - `CONTEXTOR_LLM_URL`
    /// - `CONTEXTOR_MODEL`
    /// - `CONTEXTOR_CHAT_DIR`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from an environment lookup.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.llm.api_key.is_none() {
            self.llm.api_key = lookup("CONTEXTOR_API_KEY").or_else(|| lookup("OPENAI_API_KEY"));
        }
        if self.embedding.api_key.is_none() {
            self.embedding.api_key = self.llm.api_key.clone();
        }
        if let Some(url) = lookup("CONTEXTOR_LLM_URL") {
            self.llm.base_url = url;
        }
        if let Some(model) = lookup("CONTEXTOR_MODEL") {
            self.llm.model = model;
        }
        if let Some(dir) = lookup("CONTEXTOR_CHAT_DIR") {
            self.store.chat_dir = PathBuf::from(dir);
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".contextor")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.llm.classify_temperature) {
            return Err(ConfigError::ValidationError(
                "llm.classify_temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.llm.timeout_secs == 0 || self.llm.classify_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "llm timeouts must be greater than zero".into(),
            ));
        }

        if self.embedding.dimensions == 0 {
            return Err(ConfigError::ValidationError(
                "embedding.dimensions must be greater than zero".into(),
            ));
        }

        let chunking = &self.chunking;
        if chunking.max_chunk_size == 0 {
            return Err(ConfigError::ValidationError(
                "chunking.max_chunk_size must be greater than zero".into(),
            ));
        }
        if chunking.overlap_size >= chunking.max_chunk_size {
            return Err(ConfigError::ValidationError(format!(
                "chunking.overlap_size ({}) must be smaller than max_chunk_size ({})",
                chunking.overlap_size, chunking.max_chunk_size
            )));
        }
        if chunking.turns_per_chunk == 0 || chunking.time_window_hours == 0 {
            return Err(ConfigError::ValidationError(
                "chunking.turns_per_chunk and time_window_hours must be greater than zero".into(),
            ));
        }

        if self.web.fetch_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "web.fetch_timeout_secs must be greater than zero".into(),
            ));
        }

        let min_similarity = self.assembler.min_similarity;
        if !(-1.0..=1.0).contains(&min_similarity) {
            return Err(ConfigError::ValidationError(
                "assembler.min_similarity must be between -1.0 and 1.0".into(),
            ));
        }

        Ok(())
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.assembler.max_tokens, 2000);
        assert_eq!(config.retrieval.history_k, 5);
        assert_eq!(config.retrieval.web_results, 3);
        assert_eq!(config.retrieval.web_max_chars, 800);
        assert_eq!(config.chunking.strategy, ChunkKind::SlidingWindow);
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.llm.model, config.llm.model);
        assert_eq!(parsed.chunking.max_chunk_size, config.chunking.max_chunk_size);
    }

    #[test]
    fn overlap_not_smaller_than_chunk_rejected() {
        let mut config = AppConfig::default();
        config.chunking.overlap_size = config.chunking.max_chunk_size;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("overlap_size"));
    }

    #[test]
    fn out_of_range_similarity_rejected() {
        let mut config = AppConfig::default();
        config.assembler.min_similarity = 1.5;
        assert!(config.validate().is_err());

        config.assembler.min_similarity = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let config = AppConfig::load_from(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.llm.kind, LlmKind::Generate);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[llm]
kind = "openai_compat"
base_url = "http://localhost:11434/v1"

[chunking]
strategy = "turn"
turns_per_chunk = 4
"#,
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.llm.kind, LlmKind::OpenaiCompat);
        assert_eq!(config.llm.base_url, "http://localhost:11434/v1");
        assert_eq!(config.chunking.strategy, ChunkKind::Turn);
        assert_eq!(config.chunking.turns_per_chunk, 4);
        assert_eq!(config.chunking.overlap_size, 200);
        assert_eq!(config.web.fetch_timeout_secs, 10);
    }

    #[test]
    fn invalid_file_reports_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[chunking\nstrategy = ").unwrap();
        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn env_overrides_apply() {
        let env: HashMap<&str, &str> = [
            ("OPENAI_API_KEY", "sk-test"),
            ("CONTEXTOR_MODEL", "llama3"),
            ("CONTEXTOR_CHAT_DIR", "/data/chats"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_env_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.llm.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.embedding.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.llm.model, "llama3");
        assert_eq!(config.store.chat_dir, PathBuf::from("/data/chats"));
    }

    #[test]
    fn debug_output_redacts_keys() {
        let mut config = AppConfig::default();
        config.llm.api_key = Some("sk-secret".into());
        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("max_chunk_size"));
        assert!(toml_str.contains("duckduckgo"));
    }
}
