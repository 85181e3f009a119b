use super::{chunks_from_segments, Chunk, ChunkParams, ChunkingStrategy, ParamSpec, StrategyInfo, StrategyKind};
use crate::segmenter::SentenceSegmenter;
use crate::tokenizer::Tokenizer;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Groups of consecutive paragraphs separated by a blank line
pub struct ParagraphBasedChunker {
    tokenizer: Arc<Tokenizer>,
    segmenter: Arc<SentenceSegmenter>,
}

/// How evenly sized the paragraphs of a text are
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StructureQuality {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl StructureQuality {
    /// Classify the variance of paragraph lengths against their mean length
    pub fn classify(variance: f64, mean_length: f64) -> Self {
        if variance < mean_length * 0.5 {
            StructureQuality::Excellent
        } else if variance < mean_length {
            StructureQuality::Good
        } else if variance < mean_length * 2.0 {
            StructureQuality::Fair
        } else {
            StructureQuality::Poor
        }
    }
}

/// Paragraph statistics; lengths are in characters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParagraphStructure {
    pub total_paragraphs: usize,
    pub avg_paragraph_length: f64,
    pub avg_tokens_per_paragraph: f64,
    pub min_paragraph_length: usize,
    pub max_paragraph_length: usize,
    pub length_variance: f64,
    pub structure_quality: StructureQuality,
}

impl ParagraphBasedChunker {
    pub const DEFAULT_PARAGRAPHS_PER_CHUNK: usize = 1;

    pub fn new(tokenizer: Arc<Tokenizer>, segmenter: Arc<SentenceSegmenter>) -> Self {
        Self {
            tokenizer,
            segmenter,
        }
    }

    pub fn chunk_text(&self, text: &str, paragraphs_per_chunk: usize) -> Vec<Chunk> {
        self.chunk_text_with_overlap(text, paragraphs_per_chunk, 0)
    }

    pub fn chunk_text_with_overlap(
        &self,
        text: &str,
        paragraphs_per_chunk: usize,
        overlap_paragraphs: usize,
    ) -> Vec<Chunk> {
        let paragraphs = self.segmenter.paragraphs(text);
        if paragraphs.is_empty() {
            return vec![];
        }

        let per_chunk = paragraphs_per_chunk.max(1);
        let overlap = overlap_paragraphs.min(per_chunk - 1);
        if overlap != overlap_paragraphs {
            debug!(paragraphs_per_chunk, overlap_paragraphs, "paragraph overlap clamped to {}", overlap);
        }

        chunks_from_segments(
            text,
            &paragraphs,
            per_chunk,
            overlap,
            "\n\n",
            &self.tokenizer,
            StrategyKind::ParagraphBased,
        )
        .into_iter()
        .map(|(mut chunk, count)| {
            chunk.metadata.paragraph_count = Some(count);
            chunk
        })
        .collect()
    }

    pub fn analyze_structure(&self, text: &str) -> ParagraphStructure {
        let paragraphs = self.segmenter.paragraphs(text);
        if paragraphs.is_empty() {
            return ParagraphStructure {
                total_paragraphs: 0,
                avg_paragraph_length: 0.0,
                avg_tokens_per_paragraph: 0.0,
                min_paragraph_length: 0,
                max_paragraph_length: 0,
                length_variance: 0.0,
                structure_quality: StructureQuality::Poor,
            };
        }

        let lengths: Vec<usize> = paragraphs.iter().map(|p| p.text.chars().count()).collect();
        let tokens: usize = paragraphs
            .iter()
            .map(|p| self.tokenizer.count_tokens(&p.text))
            .sum();

        let n = paragraphs.len() as f64;
        let mean = lengths.iter().sum::<usize>() as f64 / n;
        let variance = lengths
            .iter()
            .map(|&l| (l as f64 - mean).powi(2))
            .sum::<f64>()
            / n;

        ParagraphStructure {
            total_paragraphs: paragraphs.len(),
            avg_paragraph_length: mean,
            avg_tokens_per_paragraph: tokens as f64 / n,
            min_paragraph_length: lengths.iter().copied().min().unwrap_or(0),
            max_paragraph_length: lengths.iter().copied().max().unwrap_or(0),
            length_variance: variance,
            structure_quality: StructureQuality::classify(variance, mean),
        }
    }
}

impl ChunkingStrategy for ParagraphBasedChunker {
    fn kind(&self) -> StrategyKind {
        StrategyKind::ParagraphBased
    }

    fn strategy_info(&self) -> StrategyInfo {
        StrategyInfo {
            name: "Paragraph-Based Chunking",
            description: "Splits text at paragraph boundaries to maintain topical coherence",
            parameters: vec![ParamSpec::int(
                "paragraphs_per_chunk",
                "Number of paragraphs per chunk",
                Self::DEFAULT_PARAGRAPHS_PER_CHUNK,
                1,
                10,
            )],
            pros: vec![
                "Maintains topical coherence",
                "Natural document structure",
                "Good for structured documents",
                "Preserves author intent",
            ],
            cons: vec![
                "Highly variable chunk sizes",
                "Depends on document formatting",
                "May create very large chunks",
                "Inconsistent paragraph detection",
            ],
            use_cases: vec![
                "Academic papers",
                "Books and articles",
                "Well-structured documents",
                "Content with clear topical breaks",
            ],
        }
    }

    fn chunk(&self, text: &str, params: &ChunkParams) -> Vec<Chunk> {
        self.chunk_text_with_overlap(
            text,
            params
                .paragraphs_per_chunk
                .unwrap_or(Self::DEFAULT_PARAGRAPHS_PER_CHUNK),
            params.overlap_paragraphs.unwrap_or(0),
        )
    }
}
