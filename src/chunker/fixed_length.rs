use super::{trim_window, Chunk, ChunkMetadata, ChunkParams, ChunkingStrategy, ParamSpec, StrategyInfo, StrategyKind};
use crate::tokenizer::Tokenizer;
use std::sync::Arc;
use tracing::debug;

/// Consecutive, non-overlapping windows of `chunk_size` tokens
pub struct FixedLengthChunker {
    tokenizer: Arc<Tokenizer>,
}

impl FixedLengthChunker {
    pub const DEFAULT_CHUNK_SIZE: usize = 512;

    pub fn new(tokenizer: Arc<Tokenizer>) -> Self {
        Self { tokenizer }
    }

    pub fn chunk_text(&self, text: &str, chunk_size: usize) -> Vec<Chunk> {
        if text.trim().is_empty() {
            return vec![];
        }
        if chunk_size == 0 {
            debug!("chunk_size 0 clamped to 1");
        }

        let windows = self.tokenizer.windows(text, chunk_size.max(1), 0);

        // Whitespace-only windows are dropped without using up a chunk id
        windows
            .windows
            .iter()
            .filter_map(trim_window)
            .enumerate()
            .map(|(chunk_id, (content, positions))| Chunk {
                content: content.to_string(),
                metadata: ChunkMetadata::new(
                    StrategyKind::FixedLength,
                    chunk_id,
                    self.tokenizer.count_tokens(content),
                    positions,
                ),
            })
            .collect()
    }
}

impl ChunkingStrategy for FixedLengthChunker {
    fn kind(&self) -> StrategyKind {
        StrategyKind::FixedLength
    }

    fn strategy_info(&self) -> StrategyInfo {
        StrategyInfo {
            name: "Fixed-Length Token Chunking",
            description: "Splits text into chunks of exactly the specified number of tokens",
            parameters: vec![ParamSpec::int(
                "chunk_size",
                "Number of tokens per chunk",
                Self::DEFAULT_CHUNK_SIZE,
                50,
                2048,
            )],
            pros: vec![
                "Predictable chunk sizes",
                "Simple to implement",
                "Good for consistent processing",
                "Memory efficient",
            ],
            cons: vec![
                "May break sentences/paragraphs",
                "Context loss at boundaries",
                "Inflexible to content structure",
                "No semantic awareness",
            ],
            use_cases: vec![
                "When you need consistent chunk sizes",
                "Simple RAG implementations",
                "Token-constrained models",
                "Batch processing requirements",
            ],
        }
    }

    fn chunk(&self, text: &str, params: &ChunkParams) -> Vec<Chunk> {
        self.chunk_text(text, params.chunk_size.unwrap_or(Self::DEFAULT_CHUNK_SIZE))
    }
}
