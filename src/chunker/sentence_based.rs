use super::{chunks_from_segments, Chunk, ChunkParams, ChunkingStrategy, ParamSpec, StrategyInfo, StrategyKind};
use crate::segmenter::SentenceSegmenter;
use crate::tokenizer::Tokenizer;
use std::sync::Arc;
use tracing::debug;

/// Groups of consecutive sentences joined by single spaces
pub struct SentenceBasedChunker {
    tokenizer: Arc<Tokenizer>,
    segmenter: Arc<SentenceSegmenter>,
}

impl SentenceBasedChunker {
    pub const DEFAULT_SENTENCES_PER_CHUNK: usize = 5;

    pub fn new(tokenizer: Arc<Tokenizer>, segmenter: Arc<SentenceSegmenter>) -> Self {
        Self {
            tokenizer,
            segmenter,
        }
    }

    pub fn chunk_text(&self, text: &str, sentences_per_chunk: usize) -> Vec<Chunk> {
        self.chunk_text_with_overlap(text, sentences_per_chunk, 0)
    }

    /// Consecutive chunks share `overlap_sentences` sentences; `overlap`
    /// reports the tokens in the shared leading sentences.
    pub fn chunk_text_with_overlap(
        &self,
        text: &str,
        sentences_per_chunk: usize,
        overlap_sentences: usize,
    ) -> Vec<Chunk> {
        let sentences = self.segmenter.split(text);
        if sentences.is_empty() {
            return vec![];
        }

        let per_chunk = sentences_per_chunk.max(1);
        let overlap = overlap_sentences.min(per_chunk - 1);
        if overlap != overlap_sentences {
            debug!(sentences_per_chunk, overlap_sentences, "sentence overlap clamped to {}", overlap);
        }

        chunks_from_segments(
            text,
            &sentences,
            per_chunk,
            overlap,
            " ",
            &self.tokenizer,
            StrategyKind::SentenceBased,
        )
        .into_iter()
        .map(|(mut chunk, count)| {
            chunk.metadata.sentence_count = Some(count);
            chunk
        })
        .collect()
    }
}

impl ChunkingStrategy for SentenceBasedChunker {
    fn kind(&self) -> StrategyKind {
        StrategyKind::SentenceBased
    }

    fn strategy_info(&self) -> StrategyInfo {
        StrategyInfo {
            name: "Sentence-Based Chunking",
            description: "Groups complete sentences together to maintain semantic coherence",
            parameters: vec![ParamSpec::int(
                "sentences_per_chunk",
                "Number of sentences per chunk",
                Self::DEFAULT_SENTENCES_PER_CHUNK,
                1,
                20,
            )],
            pros: vec![
                "Preserves sentence integrity",
                "Natural language boundaries",
                "Good readability",
                "Maintains local context",
            ],
            cons: vec![
                "Variable chunk sizes",
                "Dependent on sentence detection accuracy",
                "May create very small/large chunks",
                "Language-specific challenges",
            ],
            use_cases: vec![
                "Literature analysis",
                "Legal documents",
                "When sentence integrity matters",
                "Educational content processing",
            ],
        }
    }

    fn chunk(&self, text: &str, params: &ChunkParams) -> Vec<Chunk> {
        self.chunk_text_with_overlap(
            text,
            params
                .sentences_per_chunk
                .unwrap_or(Self::DEFAULT_SENTENCES_PER_CHUNK),
            params.overlap_sentences.unwrap_or(0),
        )
    }
}
