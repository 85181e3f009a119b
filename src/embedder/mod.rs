pub mod batcher;
pub mod client;
pub mod error;
pub mod model;
pub mod types;


pub use batcher::Batcher;
pub use client::EmbeddingClient;
pub use error::EmbedError;
pub use model::EmbeddingModelInfo;
pub use types::{EmbeddingRequest, EmbeddingResponse};

/// Sentence embedding backend: one fixed-length vector per input text, in order
pub trait Embedder: Send + Sync {
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedError>;

    /// The dimensionality of the output vectors.
    fn dimensions(&self) -> usize;
}

/// Check that a backend answered with one non-empty vector per text and a
/// single dimensionality. Returns that dimensionality.
pub fn validate_embeddings(embeddings: &[Vec<f32>], expected: usize) -> Result<usize, EmbedError> {
    if embeddings.len() != expected {
        return Err(EmbedError::CountMismatch {
            expected,
            actual: embeddings.len(),
        });
    }

    let dim = embeddings.first().map(Vec::len).unwrap_or(0);
    if dim == 0 {
        return Err(EmbedError::EmptyVectors);
    }

    if let Some(bad) = embeddings.iter().find(|e| e.len() != dim) {
        return Err(EmbedError::DimensionMismatch {
            expected: dim,
            actual: bad.len(),
        });
    }

    Ok(dim)
}
