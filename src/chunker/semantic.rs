use super::{Chunk, ChunkMetadata, ChunkParams, ChunkingStrategy, ParamSpec, StrategyInfo, StrategyKind};
use crate::clusterer::{group_by_similarity, similarity_matrix, ClusterOutcome, Grouping};
use crate::embedder::{validate_embeddings, EmbedError, Embedder};
use crate::segmenter::{Segment, SentenceSegmenter};
use crate::span::{CharOffsets, Span};
use crate::tokenizer::Tokenizer;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// How `start_pos`/`end_pos` of semantic chunks are computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionPrecision {
    /// Start at the first occurrence of the chunk's first sentence in the
    /// source, end at start + content length.
    #[default]
    BestEffort,
    /// Smallest source range covering every member sentence
    SentenceSpan,
}

/// Chunks plus the grouping path that produced them
#[derive(Debug, Clone, PartialEq)]
pub struct SemanticChunks {
    pub chunks: Vec<Chunk>,
    pub outcome: ClusterOutcome,
}

/// Similarity between emitted chunks
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "analysis", rename_all = "snake_case")]
pub enum CoherenceReport {
    Unavailable,
    Complete {
        /// Mean cosine similarity over all distinct chunk pairs
        average_inter_chunk_similarity: f32,
        similarity_matrix: Vec<Vec<f32>>,
    },
}

/// Groups sentences by embedding similarity, then packs each group into
/// chunks of at most `max_chunk_size` tokens.
///
/// Without an embedder (or when it fails) sentences are packed in document
/// order by token budget instead.
pub struct SemanticChunker {
    tokenizer: Arc<Tokenizer>,
    segmenter: Arc<SentenceSegmenter>,
    embedder: Option<Arc<dyn Embedder>>,
    precision: PositionPrecision,
}

/// One packed run of sentences before it becomes a chunk
struct Draft<'a> {
    content: String,
    sentences: Vec<&'a Segment>,
    /// Source span of a piece cut out of an oversized sentence
    piece: Option<Span>,
    group: usize,
}

impl SemanticChunker {
    pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.7;
    pub const DEFAULT_MAX_CHUNK_SIZE: usize = 600;

    pub fn new(tokenizer: Arc<Tokenizer>, segmenter: Arc<SentenceSegmenter>) -> Self {
        Self {
            tokenizer,
            segmenter,
            embedder: None,
            precision: PositionPrecision::default(),
        }
    }

    pub fn with_embedder(mut self, embedder: Arc<dyn Embedder>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    pub fn with_precision(mut self, precision: PositionPrecision) -> Self {
        self.precision = precision;
        self
    }

    pub fn has_embedder(&self) -> bool {
        self.embedder.is_some()
    }

    pub fn precision(&self) -> PositionPrecision {
        self.precision
    }

    pub fn chunk_text(&self, text: &str, similarity_threshold: f32, max_chunk_size: usize) -> Vec<Chunk> {
        self.chunk_text_with_outcome(text, similarity_threshold, max_chunk_size)
            .chunks
    }

    pub fn chunk_text_with_outcome(
        &self,
        text: &str,
        similarity_threshold: f32,
        max_chunk_size: usize,
    ) -> SemanticChunks {
        if max_chunk_size == 0 {
            debug!("max_chunk_size 0 clamped to 1");
        }
        let max_chunk_size = max_chunk_size.max(1);
        let sentences = self.segmenter.split(text);

        let Some(embedder) = &self.embedder else {
            debug!("no embedding backend, packing sentences by token budget");
            return self.fallback(text, &sentences, max_chunk_size);
        };

        let grouping = if sentences.len() <= 1 {
            Grouping {
                groups: (0..sentences.len()).map(|i| vec![i]).collect(),
                outcome: ClusterOutcome::Hierarchical,
            }
        } else {
            match self.embed(embedder.as_ref(), &sentences) {
                Ok(embeddings) => group_by_similarity(&embeddings, similarity_threshold),
                Err(e) => {
                    warn!(error = %e, "embedding failed, packing sentences by token budget");
                    return self.fallback(text, &sentences, max_chunk_size);
                }
            }
        };

        let drafts = grouping
            .groups
            .iter()
            .enumerate()
            .flat_map(|(group, indices)| {
                let members = indices.iter().map(|&i| &sentences[i]).collect();
                self.pack(members, max_chunk_size)
                    .into_iter()
                    .map(move |sentences| Draft {
                        content: join(&sentences),
                        sentences,
                        piece: None,
                        group,
                    })
            })
            .collect();

        debug!(
            outcome = ?grouping.outcome,
            groups = grouping.groups.len(),
            "grouped sentences"
        );

        SemanticChunks {
            chunks: self.finish(text, drafts),
            outcome: grouping.outcome,
        }
    }

    /// Mean pairwise similarity between chunk embeddings
    pub fn analyze_semantic_coherence(&self, chunks: &[Chunk]) -> CoherenceReport {
        let Some(embedder) = &self.embedder else {
            return CoherenceReport::Unavailable;
        };
        if chunks.is_empty() {
            return CoherenceReport::Unavailable;
        }

        let texts: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
        let embeddings = match embedder
            .embed_batch(&texts)
            .and_then(|e| validate_embeddings(&e, texts.len()).map(|_| e))
        {
            Ok(embeddings) => embeddings,
            Err(e) => {
                warn!(error = %e, "embedding failed, coherence unavailable");
                return CoherenceReport::Unavailable;
            }
        };

        let matrix = similarity_matrix(&embeddings);
        let mut total = 0.0;
        let mut pairs = 0;
        for i in 0..matrix.len() {
            for j in (i + 1)..matrix.len() {
                total += matrix[i][j];
                pairs += 1;
            }
        }

        CoherenceReport::Complete {
            average_inter_chunk_similarity: if pairs > 0 { total / pairs as f32 } else { 0.0 },
            similarity_matrix: matrix,
        }
    }

    fn embed(&self, embedder: &dyn Embedder, sentences: &[Segment]) -> Result<Vec<Vec<f32>>, EmbedError> {
        let texts: Vec<&str> = sentences.iter().map(|s| s.text.as_str()).collect();
        let embeddings = embedder.embed_batch(&texts)?;
        validate_embeddings(&embeddings, texts.len())?;
        Ok(embeddings)
    }

    /// Greedy packing in order: a sentence joins the open pack unless the
    /// joined text would exceed `max_tokens`. Never splits a sentence.
    fn pack<'a>(&self, sentences: Vec<&'a Segment>, max_tokens: usize) -> Vec<Vec<&'a Segment>> {
        let mut packs = Vec::new();
        let mut current: Vec<&Segment> = Vec::new();

        for sentence in sentences {
            if !current.is_empty() {
                let candidate = format!("{} {}", join(&current), sentence.text);
                if self.tokenizer.count_tokens(&candidate) > max_tokens {
                    packs.push(std::mem::take(&mut current));
                }
            }
            current.push(sentence);
        }

        if !current.is_empty() {
            packs.push(current);
        }
        packs
    }

    /// Token-budget packing of all sentences in document order. Sentences
    /// larger than the budget are cut into token windows.
    fn fallback(&self, text: &str, sentences: &[Segment], max_tokens: usize) -> SemanticChunks {
        let mut drafts = Vec::new();

        for pack in self.pack(sentences.iter().collect(), max_tokens) {
            let content = join(&pack);
            if pack.len() == 1 && self.tokenizer.count_tokens(&content) > max_tokens {
                let sentence = pack[0];
                let source = sentence.span.slice(text);
                // Pieces come in source order; search past the previous one
                let mut cursor = 0;
                for piece in self.tokenizer.split_by_tokens(&sentence.text, max_tokens) {
                    let piece = piece.trim();
                    if piece.is_empty() {
                        continue;
                    }
                    let span = source
                        .get(cursor..)
                        .and_then(|rest| rest.find(piece))
                        .map(|offset| {
                            let start = sentence.span.start + cursor + offset;
                            cursor += offset + piece.len();
                            Span::new(start, start + piece.len())
                        })
                        .unwrap_or(sentence.span);
                    drafts.push(Draft {
                        content: piece.to_string(),
                        sentences: vec![sentence],
                        piece: Some(span),
                        group: drafts.len(),
                    });
                }
            } else {
                drafts.push(Draft {
                    content,
                    sentences: pack,
                    piece: None,
                    group: drafts.len(),
                });
            }
        }

        SemanticChunks {
            chunks: self.finish(text, drafts),
            outcome: ClusterOutcome::Fallback,
        }
    }

    fn finish(&self, text: &str, drafts: Vec<Draft<'_>>) -> Vec<Chunk> {
        let offsets = CharOffsets::new(text);
        let total_chars = offsets.of(text.len());

        drafts
            .into_iter()
            .enumerate()
            .map(|(chunk_id, draft)| {
                let positions = match self.precision {
                    PositionPrecision::SentenceSpan => {
                        let span = draft.piece.unwrap_or_else(|| {
                            draft
                                .sentences
                                .iter()
                                .skip(1)
                                .fold(draft.sentences[0].span, |acc, s| acc.cover(&s.span))
                        });
                        offsets.span(span)
                    }
                    PositionPrecision::BestEffort => {
                        let needle = match draft.piece {
                            Some(_) => draft.content.as_str(),
                            None => draft.sentences[0].text.as_str(),
                        };
                        let start = text.find(needle).map(|b| offsets.of(b)).unwrap_or(0);
                        (start, (start + draft.content.chars().count()).min(total_chars))
                    }
                };

                let mut metadata = ChunkMetadata::new(
                    StrategyKind::Semantic,
                    chunk_id,
                    self.tokenizer.count_tokens(&draft.content),
                    positions,
                );
                metadata.sentence_count = Some(draft.sentences.len());
                metadata.semantic_group = Some(draft.group);

                Chunk {
                    content: draft.content,
                    metadata,
                }
            })
            .collect()
    }
}

fn join(sentences: &[&Segment]) -> String {
    sentences
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

impl ChunkingStrategy for SemanticChunker {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Semantic
    }

    fn strategy_info(&self) -> StrategyInfo {
        StrategyInfo {
            name: "Semantic Chunking",
            description: "Groups semantically similar sentences using embedding similarity",
            parameters: vec![
                ParamSpec::float(
                    "similarity_threshold",
                    "Minimum similarity to group sentences",
                    Self::DEFAULT_SIMILARITY_THRESHOLD,
                    0.1,
                    0.9,
                ),
                ParamSpec::int(
                    "max_chunk_size",
                    "Maximum tokens per chunk",
                    Self::DEFAULT_MAX_CHUNK_SIZE,
                    100,
                    1500,
                ),
            ],
            pros: vec![
                "Maintains semantic coherence",
                "Adaptive to content",
                "Better retrieval quality",
                "Context-aware grouping",
            ],
            cons: vec![
                "Computationally expensive",
                "Requires embedding models",
                "Complex implementation",
                "Variable processing time",
            ],
            use_cases: vec![
                "High-quality RAG systems",
                "Complex documents",
                "When semantic coherence is priority",
                "Research and analysis tasks",
            ],
        }
    }

    fn chunk(&self, text: &str, params: &ChunkParams) -> Vec<Chunk> {
        self.chunk_text(
            text,
            params
                .similarity_threshold
                .unwrap_or(Self::DEFAULT_SIMILARITY_THRESHOLD),
            params.max_chunk_size.unwrap_or(Self::DEFAULT_MAX_CHUNK_SIZE),
        )
    }
}
