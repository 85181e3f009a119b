use super::{trim_window, Chunk, ChunkMetadata, ChunkParams, ChunkingStrategy, ParamSpec, StrategyInfo, StrategyKind};
use crate::tokenizer::Tokenizer;
use std::sync::Arc;
use tracing::debug;

/// Windows of `chunk_size` tokens where neighbours share `overlap` tokens
pub struct SlidingWindowChunker {
    tokenizer: Arc<Tokenizer>,
}

impl SlidingWindowChunker {
    pub const DEFAULT_CHUNK_SIZE: usize = 512;
    pub const DEFAULT_OVERLAP: usize = 50;

    pub fn new(tokenizer: Arc<Tokenizer>) -> Self {
        Self { tokenizer }
    }

    /// An `overlap` that is not smaller than `chunk_size` becomes
    /// `chunk_size / 2`.
    pub fn chunk_text(&self, text: &str, chunk_size: usize, overlap: usize) -> Vec<Chunk> {
        if text.trim().is_empty() {
            return vec![];
        }

        let chunk_size = chunk_size.max(1);
        let overlap = if overlap >= chunk_size {
            debug!(chunk_size, overlap, "overlap not below chunk_size, using half the chunk size");
            chunk_size / 2
        } else {
            overlap
        };

        let windows = self.tokenizer.windows(text, chunk_size, overlap);

        windows
            .windows
            .iter()
            .enumerate()
            .filter_map(|(i, window)| trim_window(window).map(|trimmed| (i, trimmed)))
            .enumerate()
            .map(|(chunk_id, (i, (content, positions)))| {
                let mut metadata = ChunkMetadata::new(
                    StrategyKind::SlidingWindow,
                    chunk_id,
                    self.tokenizer.count_tokens(content),
                    positions,
                );
                metadata.overlap = if chunk_id == 0 {
                    0
                } else {
                    windows.overlap_tokens(i)
                };
                Chunk {
                    content: content.to_string(),
                    metadata,
                }
            })
            .collect()
    }
}

impl ChunkingStrategy for SlidingWindowChunker {
    fn kind(&self) -> StrategyKind {
        StrategyKind::SlidingWindow
    }

    fn strategy_info(&self) -> StrategyInfo {
        StrategyInfo {
            name: "Sliding Window Chunking",
            description: "Creates overlapping chunks with specified overlap to maintain context",
            parameters: vec![
                ParamSpec::int(
                    "chunk_size",
                    "Number of tokens per chunk",
                    Self::DEFAULT_CHUNK_SIZE,
                    50,
                    2048,
                ),
                ParamSpec::int(
                    "overlap",
                    "Number of tokens to overlap between chunks",
                    Self::DEFAULT_OVERLAP,
                    0,
                    500,
                ),
            ],
            pros: vec![
                "Maintains context across chunks",
                "Reduces information loss",
                "Better for question answering",
                "Handles boundary issues well",
            ],
            cons: vec![
                "Increased storage requirements",
                "Processing overhead",
                "Potential redundancy",
                "Higher computational cost",
            ],
            use_cases: vec![
                "Question answering systems",
                "When context preservation is crucial",
                "Complex document analysis",
                "Multi-step reasoning tasks",
            ],
        }
    }

    fn chunk(&self, text: &str, params: &ChunkParams) -> Vec<Chunk> {
        self.chunk_text(
            text,
            params.chunk_size.unwrap_or(Self::DEFAULT_CHUNK_SIZE),
            params.overlap.unwrap_or(Self::DEFAULT_OVERLAP),
        )
    }
}
