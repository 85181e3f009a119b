// Public API exports
pub mod chunker;
pub mod clusterer;
pub mod config;
pub mod embedder;
pub mod segmenter;
pub mod span;
pub mod tokenizer;

#[cfg(test)]
mod test_utils;

// Re-export main types for convenience
pub use chunker::{
    Chunk, ChunkMetadata, ChunkParams, ChunkingStrategy, CoherenceReport, FixedLengthChunker,
    ParagraphBasedChunker, ParagraphStructure, PositionPrecision, SemanticChunker, SemanticChunks,
    SentenceBasedChunker, SlidingWindowChunker, StrategyInfo, StrategyKind, StrategyRegistry,
    StructureQuality,
};

pub use clusterer::{ClusterError, ClusterOutcome};

pub use config::{ConfigError, EmbeddingConfig, EngineConfig};

pub use embedder::{EmbedError, Embedder, EmbeddingClient, EmbeddingModelInfo};

pub use segmenter::{Segment, SentenceBackendKind, SentenceSegmenter, SentenceSplitter};

pub use tokenizer::{TokenEncoder, Tokenizer, TokenizerError, WORD_TOKEN_RATIO};
