//! Chunking strategies.
//!
//! Every strategy turns a document into an ordered list of [`Chunk`]s. The
//! strategies only hold shared, read-only backends; all sizes and thresholds
//! are passed per call, so one instance can serve any number of callers.

mod fixed_length;
mod info;
mod paragraph_based;
mod registry;
mod semantic;
mod sentence_based;
mod sliding_window;


pub use fixed_length::FixedLengthChunker;
pub use info::{ParamKind, ParamSpec, ParamValue, StrategyInfo};
pub use paragraph_based::{ParagraphBasedChunker, ParagraphStructure, StructureQuality};
pub use registry::StrategyRegistry;
pub use semantic::{CoherenceReport, PositionPrecision, SemanticChunker, SemanticChunks};
pub use sentence_based::SentenceBasedChunker;
pub use sliding_window::SlidingWindowChunker;

use crate::segmenter::Segment;
use crate::span::{CharOffsets, Span};
use crate::tokenizer::{TokenWindow, Tokenizer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

/// A chunk of text ready for embedding/indexing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Trimmed chunk text
    pub content: String,
    #[serde(flatten)]
    pub metadata: ChunkMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Tokens in `content` under the active tokenizer
    pub token_count: usize,
    /// Character offset in the source text (start)
    pub start_pos: usize,
    /// Character offset in the source text (end)
    pub end_pos: usize,
    /// Tokens shared with the previous chunk
    pub overlap: usize,
    /// Position in emission order
    pub chunk_id: usize,
    pub strategy: StrategyKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentence_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraph_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantic_group: Option<usize>,
}

impl ChunkMetadata {
    fn new(strategy: StrategyKind, chunk_id: usize, token_count: usize, (start_pos, end_pos): (usize, usize)) -> Self {
        Self {
            token_count,
            start_pos,
            end_pos: end_pos.max(start_pos),
            overlap: 0,
            chunk_id,
            strategy,
            sentence_count: None,
            paragraph_count: None,
            semantic_group: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    FixedLength,
    SlidingWindow,
    SentenceBased,
    ParagraphBased,
    #[serde(rename = "semantic_chunking")]
    Semantic,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 5] = [
        StrategyKind::FixedLength,
        StrategyKind::SlidingWindow,
        StrategyKind::SentenceBased,
        StrategyKind::ParagraphBased,
        StrategyKind::Semantic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::FixedLength => "fixed_length",
            StrategyKind::SlidingWindow => "sliding_window",
            StrategyKind::SentenceBased => "sentence_based",
            StrategyKind::ParagraphBased => "paragraph_based",
            StrategyKind::Semantic => "semantic_chunking",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fixed_length" | "fixed" => Ok(StrategyKind::FixedLength),
            "sliding_window" | "sliding" => Ok(StrategyKind::SlidingWindow),
            "sentence_based" | "sentence" => Ok(StrategyKind::SentenceBased),
            "paragraph_based" | "paragraph" => Ok(StrategyKind::ParagraphBased),
            "semantic_chunking" | "semantic" => Ok(StrategyKind::Semantic),
            other => Err(format!("unknown chunking strategy: {}", other)),
        }
    }
}

/// Named parameters for [`ChunkingStrategy::chunk`].
/// Anything left out takes the strategy's default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlap: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentences_per_chunk: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlap_sentences: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paragraphs_per_chunk: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlap_paragraphs: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity_threshold: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_chunk_size: Option<usize>,
}

/// Common contract of all chunking strategies
pub trait ChunkingStrategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    /// Static description: name, parameters, trade-offs
    fn strategy_info(&self) -> StrategyInfo;

    fn chunk(&self, text: &str, params: &ChunkParams) -> Vec<Chunk>;
}

/// Trim a token window, keeping its character positions in step
fn trim_window(window: &TokenWindow) -> Option<(&str, (usize, usize))> {
    let trimmed = window.text.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lead = window.text[..window.text.len() - window.text.trim_start().len()]
        .chars()
        .count();
    let start = window.start + lead;
    Some((trimmed, (start, start + trimmed.chars().count())))
}

/// Index ranges of `size` consecutive units, each starting `size - overlap`
/// after the previous one. Stops as soon as a range reaches the last unit.
fn unit_windows(len: usize, size: usize, overlap: usize) -> Vec<Range<usize>> {
    let size = size.max(1);
    let step = size - overlap.min(size - 1);
    let mut ranges = Vec::new();
    let mut start = 0;

    while start < len {
        let end = (start + size).min(len);
        ranges.push(start..end);
        if end >= len {
            break;
        }
        start += step;
    }

    ranges
}

/// Chunks built from consecutive sentences or paragraphs
fn chunks_from_segments(
    source: &str,
    segments: &[Segment],
    per_chunk: usize,
    overlap_units: usize,
    separator: &str,
    tokenizer: &Tokenizer,
    strategy: StrategyKind,
) -> Vec<(Chunk, usize)> {
    let offsets = CharOffsets::new(source);
    let join = |range: Range<usize>| {
        segments[range]
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(separator)
    };

    unit_windows(segments.len(), per_chunk, overlap_units)
        .into_iter()
        .enumerate()
        .map(|(chunk_id, range)| {
            let content = join(range.clone());
            let span = segments[range.clone()]
                .iter()
                .fold(segments[range.start].span, |acc: Span, s| acc.cover(&s.span));
            let overlap = if chunk_id == 0 || overlap_units == 0 {
                0
            } else {
                let shared = (range.start + overlap_units).min(range.end);
                tokenizer.count_tokens(&join(range.start..shared))
            };

            let mut metadata = ChunkMetadata::new(
                strategy,
                chunk_id,
                tokenizer.count_tokens(&content),
                offsets.span(span),
            );
            metadata.overlap = overlap;

            (Chunk { content, metadata }, range.len())
        })
        .collect()
}
