//! Engine configuration, resolved once into a [`StrategyRegistry`].

use crate::chunker::{PositionPrecision, SemanticChunker, StrategyRegistry};
use crate::embedder::{EmbedError, EmbeddingClient, EmbeddingModelInfo};
use crate::segmenter::{SentenceBackendKind, SentenceSegmenter};
use crate::tokenizer::{Tokenizer, DEFAULT_TOKENIZER_MODEL};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),

    #[error("Embedding backend unavailable: {0}")]
    Embedding(#[from] EmbedError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Model whose subword encoding counts tokens
    pub tokenizer_model: String,
    pub sentence_backend: SentenceBackendKind,
    /// Semantic chunking falls back to token-budget packing without this
    pub embedding: Option<EmbeddingConfig>,
    pub position_precision: PositionPrecision,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Base URL of the embedding server; requests go to `{endpoint}/embed`
    pub endpoint: String,
    #[serde(default)]
    pub model: EmbeddingModelInfo,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    60
}

impl EmbeddingConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            model: EmbeddingModelInfo::default(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tokenizer_model: DEFAULT_TOKENIZER_MODEL.to_string(),
            sentence_backend: SentenceBackendKind::default(),
            embedding: None,
            position_precision: PositionPrecision::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tokenizer_model.trim().is_empty() {
            return Err(ConfigError::Invalid("tokenizer_model is empty".to_string()));
        }

        if let Some(embedding) = &self.embedding {
            if embedding.endpoint.trim().is_empty() {
                return Err(ConfigError::Invalid("embedding.endpoint is empty".to_string()));
            }
            if embedding.model.dim == 0 {
                return Err(ConfigError::Invalid("embedding.model.dim must be positive".to_string()));
            }
        }

        Ok(())
    }

    pub fn tokenizer(&self) -> Tokenizer {
        Tokenizer::for_model(&self.tokenizer_model)
    }

    pub fn segmenter(&self) -> SentenceSegmenter {
        SentenceSegmenter::from_kind(self.sentence_backend)
    }

    /// Load the backends once and register every strategy on top of them
    pub fn build_registry(&self) -> Result<StrategyRegistry, ConfigError> {
        let tokenizer = Arc::new(self.tokenizer());
        let segmenter = Arc::new(self.segmenter());

        let mut semantic = SemanticChunker::new(tokenizer.clone(), segmenter.clone())
            .with_precision(self.position_precision);
        if let Some(embedding) = &self.embedding {
            let client = EmbeddingClient::with_model(
                embedding.endpoint.clone(),
                embedding.model.clone(),
                Duration::from_secs(embedding.timeout_secs),
            )?;
            semantic = semantic.with_embedder(Arc::new(client));
        }

        info!(
            tokenizer = tokenizer.name(),
            sentences = ?self.sentence_backend,
            embedding = self.embedding.as_ref().map(|e| e.endpoint.as_str()).unwrap_or("none"),
            "engine ready"
        );

        Ok(StrategyRegistry::with_semantic(tokenizer, segmenter, semantic))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.tokenizer_model, "gpt-3.5-turbo");
        assert_eq!(config.sentence_backend, SentenceBackendKind::Unicode);
        assert!(config.embedding.is_none());
        assert_eq!(config.position_precision, PositionPrecision::BestEffort);
    }

    #[test]
    fn test_from_json_partial() {
        let config = EngineConfig::from_json_str(
            r#"{
                "sentence_backend": "regex",
                "position_precision": "sentence_span",
                "embedding": { "endpoint": "http://localhost:18115" }
            }"#,
        )
        .unwrap();

        assert_eq!(config.tokenizer_model, DEFAULT_TOKENIZER_MODEL);
        assert_eq!(config.sentence_backend, SentenceBackendKind::Regex);
        assert_eq!(config.position_precision, PositionPrecision::SentenceSpan);

        let embedding = config.embedding.unwrap();
        assert_eq!(embedding.model, EmbeddingModelInfo::default());
        assert_eq!(embedding.timeout_secs, 60);
    }

    #[test]
    fn test_rejects_bad_config() {
        assert!(matches!(
            EngineConfig::from_json_str("{ not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            EngineConfig::from_json_str(r#"{"embedding": {"endpoint": " "}}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            EngineConfig::from_json_str(r#"{"tokenizer_model": ""}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            EngineConfig::from_file("/nonexistent/chunkwise.json"),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn test_build_registry_without_embedder() {
        let config = EngineConfig {
            sentence_backend: SentenceBackendKind::Regex,
            ..EngineConfig::default()
        };
        let registry = config.build_registry().unwrap();

        assert_eq!(registry.strategies().len(), 5);
        let chunks = registry.chunk(
            crate::chunker::StrategyKind::SentenceBased,
            "A. B. C.",
            &crate::chunker::ChunkParams {
                sentences_per_chunk: Some(2),
                ..Default::default()
            },
        );
        assert_eq!(chunks.len(), 2);
    }

    #[test]
    fn test_build_registry_with_embedder() {
        let config = EngineConfig::from_json_str(
            r#"{
                "sentence_backend": "regex",
                "embedding": { "endpoint": "http://127.0.0.1:9", "timeout_secs": 2 }
            }"#,
        )
        .unwrap();
        let registry = config.build_registry().unwrap();

        // Unreachable server: semantic chunking still answers through fallback
        let chunks = registry.chunk(
            crate::chunker::StrategyKind::Semantic,
            "One two three. Four five six.",
            &crate::chunker::ChunkParams::default(),
        );
        assert!(!chunks.is_empty());
    }
}
