//! Build backends from configuration.

use std::sync::Arc;

use contextor_config::{EmbeddingConfig, EmbeddingProviderKind, LlmConfig, LlmKind};
use contextor_core::error::ProviderError;
use contextor_core::provider::{Embedder, LanguageModel};

use crate::generate::GenerateEndpointModel;
use crate::hash::HashEmbedder;
use crate::openai_compat::{OpenAiCompatEmbedder, OpenAiCompatModel};

/// The configured language model, or `None` when classification should
/// rely on keyword rules alone.
pub fn build_language_model(
    config: &LlmConfig,
) -> Result<Option<Arc<dyn LanguageModel>>, ProviderError> {
    let model: Arc<dyn LanguageModel> = match config.kind {
        LlmKind::None => return Ok(None),
        LlmKind::OpenaiCompat => Arc::new(OpenAiCompatModel::new(
            &config.base_url,
            &config.model,
            config.api_key.clone(),
            config.timeout_secs,
        )?),
        LlmKind::Generate => Arc::new(GenerateEndpointModel::new(
            &config.base_url,
            &config.model,
            config.timeout_secs,
        )?),
    };
    tracing::debug!(backend = model.name(), model = %config.model, "Language model configured");
    Ok(Some(model))
}

pub fn build_embedder(config: &EmbeddingConfig) -> Result<Arc<dyn Embedder>, ProviderError> {
    let embedder: Arc<dyn Embedder> = match config.provider {
        EmbeddingProviderKind::Hash => Arc::new(HashEmbedder::new(config.dimensions)),
        EmbeddingProviderKind::OpenaiCompat => {
            if config.api_key.is_none() && config.base_url.contains("api.openai.com") {
                return Err(ProviderError::NotConfigured(
                    "embedding.api_key is required for api.openai.com".into(),
                ));
            }
            Arc::new(OpenAiCompatEmbedder::new(
                &config.base_url,
                &config.model,
                config.api_key.clone(),
                config.timeout_secs,
            )?)
        }
    };
    Ok(embedder)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_kind_builds_no_model() {
        let config = LlmConfig {
            kind: LlmKind::None,
            ..Default::default()
        };
        assert!(build_language_model(&config).unwrap().is_none());
    }

    #[test]
    fn kinds_select_backends() {
        let mut config = LlmConfig::default();
        let model = build_language_model(&config).unwrap().unwrap();
        assert_eq!(model.name(), "generate");

        config.kind = LlmKind::OpenaiCompat;
        let model = build_language_model(&config).unwrap().unwrap();
        assert_eq!(model.name(), "openai_compat");
    }

    #[test]
    fn default_embedder_is_hash() {
        let embedder = build_embedder(&EmbeddingConfig::default()).unwrap();
        assert_eq!(embedder.name(), "hash");
    }

    #[test]
    fn openai_embeddings_need_a_key() {
        let config = EmbeddingConfig {
            provider: EmbeddingProviderKind::OpenaiCompat,
            ..Default::default()
        };
        let err = build_embedder(&config).err().unwrap();
        assert!(matches!(err, ProviderError::NotConfigured(_)));
    }
}
