// client.rs - blocking HTTP client for a sentence embedding server
use super::{Batcher, EmbedError, Embedder, EmbeddingModelInfo, EmbeddingRequest, EmbeddingResponse};
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

pub struct EmbeddingClient {
    http: Client,
    endpoint: String,
    model: EmbeddingModelInfo,
    batcher: Batcher,
}

impl EmbeddingClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, EmbedError> {
        Self::with_model(endpoint, EmbeddingModelInfo::default(), DEFAULT_TIMEOUT)
    }

    pub fn with_model(
        endpoint: impl Into<String>,
        model: EmbeddingModelInfo,
        timeout: Duration,
    ) -> Result<Self, EmbedError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(EmbedError::ClientBuild)?;

        Ok(Self {
            http,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            batcher: Batcher::new(model.max_batch),
            model,
        })
    }

    pub fn model(&self) -> &EmbeddingModelInfo {
        &self.model
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Embed texts, one request per batch
    pub fn embed_blocking(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, EmbedError> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let mut embeddings = Vec::with_capacity(texts.len());

        for batch in self.batcher.split(&texts) {
            let req = EmbeddingRequest {
                texts: batch.to_vec(),
            };
            let response = self
                .http
                .post(format!("{}/embed", self.endpoint))
                .json(&req)
                .send()?;

            let status = response.status();
            if !status.is_success() {
                let body = response
                    .text()
                    .unwrap_or_else(|_| "Unknown error".to_string());
                return Err(EmbedError::Server {
                    status: status.as_u16(),
                    body,
                });
            }

            let res: EmbeddingResponse = response.json()?;
            if res.embeddings.len() != batch.len() {
                return Err(EmbedError::CountMismatch {
                    expected: batch.len(),
                    actual: res.embeddings.len(),
                });
            }
            embeddings.extend(res.embeddings);
        }

        debug!(
            model = %self.model.name,
            count = embeddings.len(),
            "received embeddings"
        );
        Ok(embeddings)
    }
}

impl Embedder for EmbeddingClient {
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedError> {
        let embeddings = self.embed_blocking(texts.iter().map(|t| t.to_string()).collect())?;

        if let Some(first) = embeddings.first() {
            if first.len() != self.model.dim {
                return Err(EmbedError::DimensionMismatch {
                    expected: self.model.dim,
                    actual: first.len(),
                });
            }
        }

        Ok(embeddings)
    }

    fn dimensions(&self) -> usize {
        self.model.dim
    }
}
