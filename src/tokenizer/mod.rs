//! Token counting with a subword vocabulary, or a word-based estimate when no
//! vocabulary can be loaded.
//!
//! The estimate uses a single calibration factor, [`WORD_TOKEN_RATIO`], for
//! counting, truncating and splitting so that size limits mean the same thing
//! in every strategy.

mod backend;
mod error;
mod window;


pub use backend::{TiktokenEncoder, TokenEncoder, TokenizerBackend};
pub use error::TokenizerError;
pub use window::{TokenWindow, Windows};

use crate::span::{CharOffsets, Span};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Estimated tokens per whitespace-delimited word
pub const WORD_TOKEN_RATIO: f64 = 0.75;

/// Model whose encoding is loaded by default
pub const DEFAULT_TOKENIZER_MODEL: &str = "gpt-3.5-turbo";

#[derive(Debug, Clone)]
pub struct Tokenizer {
    backend: TokenizerBackend,
}

impl Tokenizer {
    /// Resolve the best available backend for `model`:
    /// the model's own encoding, then `cl100k_base`, then the word estimate.
    pub fn for_model(model: &str) -> Self {
        match TiktokenEncoder::for_model(model) {
            Ok(encoder) => return Self::with_encoder(model, Arc::new(encoder)),
            Err(e) => debug!(model, error = %e, "model encoding not found, trying cl100k_base"),
        }

        match TiktokenEncoder::cl100k_base() {
            Ok(encoder) => Self::with_encoder("cl100k_base", Arc::new(encoder)),
            Err(e) => {
                info!(error = %e, "no subword vocabulary available, using word estimate");
                Self::word_estimate()
            }
        }
    }

    pub fn word_estimate() -> Self {
        Self {
            backend: TokenizerBackend::WordEstimate,
        }
    }

    pub fn with_encoder(name: impl Into<String>, encoder: Arc<dyn TokenEncoder>) -> Self {
        Self {
            backend: TokenizerBackend::Bpe {
                name: name.into(),
                encoder,
            },
        }
    }

    pub fn backend(&self) -> &TokenizerBackend {
        &self.backend
    }

    pub fn name(&self) -> &str {
        self.backend.name()
    }

    /// True when counts come from a real vocabulary rather than the estimate
    pub fn has_vocabulary(&self) -> bool {
        matches!(self.backend, TokenizerBackend::Bpe { .. })
    }

    pub fn count_tokens(&self, text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }

        match self.encode(text) {
            Some(tokens) => tokens.len(),
            None => estimate_tokens(text),
        }
    }

    /// Split text into token strings, one per token id. A token holding part
    /// of a multi-byte character comes out with replacement characters.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return vec![];
        }

        if let Some(offsets) = self.token_offsets(text) {
            let bytes = text.as_bytes();
            return offsets
                .windows(2)
                .map(|w| String::from_utf8_lossy(&bytes[w[0]..w[1]]).into_owned())
                .collect();
        }

        text.split_whitespace().map(str::to_string).collect()
    }

    /// Keep at most `max_tokens` tokens, cut back to the last whole character
    pub fn truncate_to_tokens(&self, text: &str, max_tokens: usize) -> String {
        if text.is_empty() {
            return String::new();
        }

        if let Some(offsets) = self.token_offsets(text) {
            if offsets.len() - 1 <= max_tokens {
                return text.to_string();
            }
            let cut = offsets[..=max_tokens]
                .iter()
                .rev()
                .copied()
                .find(|&b| text.is_char_boundary(b))
                .unwrap_or(0);
            return text[..cut].to_string();
        }

        let max_words = words_for_tokens(max_tokens);
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.len() <= max_words {
            return text.to_string();
        }
        words[..max_words].join(" ")
    }

    /// Split text into consecutive pieces of at most `chunk_size` tokens.
    /// Never returns empty strings.
    pub fn split_by_tokens(&self, text: &str, chunk_size: usize) -> Vec<String> {
        if text.is_empty() {
            return vec![];
        }

        self.windows(text, chunk_size, 0)
            .windows
            .into_iter()
            .map(|w| w.text)
            .filter(|t| !t.is_empty())
            .collect()
    }

    /// Character spans of each whitespace-delimited word
    pub fn token_positions(&self, text: &str) -> Vec<(usize, usize)> {
        let offsets = CharOffsets::new(text);
        word_spans(text)
            .into_iter()
            .map(|span| offsets.span(span))
            .collect()
    }

    /// Encode with the subword vocabulary.
    /// None when there is no vocabulary or encoding failed.
    pub(crate) fn encode(&self, text: &str) -> Option<Vec<u32>> {
        let TokenizerBackend::Bpe { encoder, .. } = &self.backend else {
            return None;
        };

        match encoder.encode(text) {
            Ok(tokens) => Some(tokens),
            Err(e) => {
                self.warn_fallback("encode", &e);
                None
            }
        }
    }

    /// Byte offset of every token boundary in `text`, from 0 to `text.len()`.
    /// Offsets may fall inside a multi-byte character.
    /// None when there is no vocabulary or the lengths do not cover the text.
    pub(crate) fn token_offsets(&self, text: &str) -> Option<Vec<usize>> {
        let TokenizerBackend::Bpe { encoder, .. } = &self.backend else {
            return None;
        };

        let lengths = match encoder.byte_lengths(text) {
            Ok(lengths) => lengths,
            Err(e) => {
                self.warn_fallback("byte_lengths", &e);
                return None;
            }
        };

        let mut offsets = Vec::with_capacity(lengths.len() + 1);
        let mut total = 0;
        offsets.push(total);
        for len in lengths {
            total += len;
            offsets.push(total);
        }

        if total != text.len() {
            warn!(
                tokenizer = self.name(),
                covered = total,
                bytes = text.len(),
                "token bytes do not match the text, using word-based estimate"
            );
            return None;
        }
        Some(offsets)
    }

    fn warn_fallback(&self, operation: &str, error: &TokenizerError) {
        warn!(
            tokenizer = self.name(),
            operation,
            error = %error,
            "tokenizer failed, using word-based estimate"
        );
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::for_model(DEFAULT_TOKENIZER_MODEL)
    }
}

/// Word-based token estimate: `floor(words * 0.75)`
pub fn estimate_tokens(text: &str) -> usize {
    tokens_for_words(text.split_whitespace().count())
}

pub(crate) fn tokens_for_words(words: usize) -> usize {
    (words as f64 * WORD_TOKEN_RATIO) as usize
}

pub(crate) fn words_for_tokens(tokens: usize) -> usize {
    (tokens as f64 / WORD_TOKEN_RATIO) as usize
}

/// Byte spans of whitespace-delimited words, matching `str::split_whitespace`
pub(crate) fn word_spans(text: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut start = None;

    for (i, c) in text.char_indices() {
        if c.is_whitespace() {
            if let Some(s) = start.take() {
                spans.push(Span::new(s, i));
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }

    if let Some(s) = start {
        spans.push(Span::new(s, text.len()));
    }

    spans
}
