use super::{
    Chunk, ChunkParams, ChunkingStrategy, FixedLengthChunker, ParagraphBasedChunker, SemanticChunker,
    SentenceBasedChunker, SlidingWindowChunker, StrategyKind,
};
use crate::segmenter::SentenceSegmenter;
use crate::tokenizer::Tokenizer;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Dispatch table for chunking strategies.
///
/// All built-in strategies share one tokenizer and one sentence segmenter so
/// they count and segment the same way.
pub struct StrategyRegistry {
    tokenizer: Arc<Tokenizer>,
    map: HashMap<StrategyKind, Box<dyn ChunkingStrategy>>,
}

impl StrategyRegistry {
    /// Register the five built-in strategies; semantic chunking runs without
    /// an embedding backend.
    pub fn new(tokenizer: Arc<Tokenizer>, segmenter: Arc<SentenceSegmenter>) -> Self {
        let semantic = SemanticChunker::new(tokenizer.clone(), segmenter.clone());
        Self::with_semantic(tokenizer, segmenter, semantic)
    }

    /// Like [`StrategyRegistry::new`] with a preconfigured semantic chunker
    pub fn with_semantic(
        tokenizer: Arc<Tokenizer>,
        segmenter: Arc<SentenceSegmenter>,
        semantic: SemanticChunker,
    ) -> Self {
        let mut registry = Self {
            tokenizer: tokenizer.clone(),
            map: HashMap::new(),
        };

        registry.register(FixedLengthChunker::new(tokenizer.clone()));
        registry.register(SlidingWindowChunker::new(tokenizer.clone()));
        registry.register(SentenceBasedChunker::new(tokenizer.clone(), segmenter.clone()));
        registry.register(ParagraphBasedChunker::new(tokenizer, segmenter));
        registry.register(semantic);
        registry
    }

    /// Register a strategy under its own kind, replacing any previous one
    pub fn register(&mut self, strategy: impl ChunkingStrategy + 'static) {
        self.map.insert(strategy.kind(), Box::new(strategy));
    }

    pub fn select(&self, kind: StrategyKind) -> Option<&dyn ChunkingStrategy> {
        self.map.get(&kind).map(|s| &**s)
    }

    /// Chunk with the selected strategy. An unregistered kind yields no chunks.
    pub fn chunk(&self, kind: StrategyKind, text: &str, params: &ChunkParams) -> Vec<Chunk> {
        let Some(strategy) = self.select(kind) else {
            warn!(strategy = %kind, "strategy not registered");
            return vec![];
        };

        let chunks = strategy.chunk(text, params);
        debug!(strategy = %kind, chunks = chunks.len(), "chunked text");
        chunks
    }

    /// Registered strategies in [`StrategyKind::ALL`] order
    pub fn strategies(&self) -> Vec<&dyn ChunkingStrategy> {
        StrategyKind::ALL
            .iter()
            .filter_map(|kind| self.select(*kind))
            .collect()
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }
}
