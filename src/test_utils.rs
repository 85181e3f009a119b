//! Deterministic stand-ins for the tokenizer and embedding backends.

use crate::embedder::{EmbedError, Embedder};
use crate::tokenizer::{TokenEncoder, Tokenizer, TokenizerError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// One token per character; token id is the code point
pub struct CharEncoder;

impl TokenEncoder for CharEncoder {
    fn encode(&self, text: &str) -> Result<Vec<u32>, TokenizerError> {
        Ok(text.chars().map(|c| c as u32).collect())
    }

    fn decode(&self, tokens: &[u32]) -> Result<String, TokenizerError> {
        tokens
            .iter()
            .map(|&t| {
                char::from_u32(t).ok_or_else(|| TokenizerError::Decode(format!("bad id {}", t)))
            })
            .collect()
    }
}

/// Encoder whose every call fails
pub struct BrokenEncoder;

impl TokenEncoder for BrokenEncoder {
    fn encode(&self, _text: &str) -> Result<Vec<u32>, TokenizerError> {
        Err(TokenizerError::Encode("vocabulary corrupted".to_string()))
    }

    fn decode(&self, _tokens: &[u32]) -> Result<String, TokenizerError> {
        Err(TokenizerError::Decode("vocabulary corrupted".to_string()))
    }
}

/// Encodes fine but cannot decode
pub struct UndecodableEncoder;

impl TokenEncoder for UndecodableEncoder {
    fn encode(&self, text: &str) -> Result<Vec<u32>, TokenizerError> {
        CharEncoder.encode(text)
    }

    fn decode(&self, _tokens: &[u32]) -> Result<String, TokenizerError> {
        Err(TokenizerError::Decode("partial code point".to_string()))
    }
}

/// One token per UTF-8 byte, so multi-byte characters span several tokens.
/// Decoding a partial character fails, like a byte-level BPE vocabulary.
pub struct ByteEncoder;

impl TokenEncoder for ByteEncoder {
    fn encode(&self, text: &str) -> Result<Vec<u32>, TokenizerError> {
        Ok(text.bytes().map(u32::from).collect())
    }

    fn decode(&self, tokens: &[u32]) -> Result<String, TokenizerError> {
        let bytes: Vec<u8> = tokens.iter().map(|&t| t as u8).collect();
        String::from_utf8(bytes).map_err(|e| TokenizerError::Decode(e.to_string()))
    }

    fn byte_lengths(&self, text: &str) -> Result<Vec<usize>, TokenizerError> {
        Ok(vec![1; text.len()])
    }
}

pub fn char_tokenizer() -> Tokenizer {
    Tokenizer::with_encoder("chars", Arc::new(CharEncoder))
}

pub fn byte_tokenizer() -> Tokenizer {
    Tokenizer::with_encoder("bytes", Arc::new(ByteEncoder))
}

/// Embeds a sentence as a one-hot vector over keyword topics.
/// Sentences mentioning none of the keywords land on a shared "other" axis.
pub struct KeywordEmbedder {
    topics: Vec<&'static str>,
    pub calls: AtomicUsize,
}

impl KeywordEmbedder {
    pub fn new(topics: Vec<&'static str>) -> Self {
        Self {
            topics,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Embedder for KeywordEmbedder {
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts
            .iter()
            .map(|text| {
                let lower = text.to_lowercase();
                let mut v = vec![0.0; self.topics.len() + 1];
                match self.topics.iter().position(|t| lower.contains(t)) {
                    Some(i) => v[i] = 1.0,
                    None => v[self.topics.len()] = 1.0,
                }
                v
            })
            .collect())
    }

    fn dimensions(&self) -> usize {
        self.topics.len() + 1
    }
}

/// Returns a fixed list of vectors regardless of the input
pub struct FixedEmbedder(pub Vec<Vec<f32>>);

impl Embedder for FixedEmbedder {
    fn embed_batch(&self, _texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedError> {
        Ok(self.0.clone())
    }

    fn dimensions(&self) -> usize {
        self.0.first().map(Vec::len).unwrap_or(0)
    }
}

/// Always fails, like an embedding server that is down
pub struct UnreachableEmbedder;

impl Embedder for UnreachableEmbedder {
    fn embed_batch(&self, _texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedError> {
        Err(EmbedError::Server {
            status: 503,
            body: "service unavailable".to_string(),
        })
    }

    fn dimensions(&self) -> usize {
        384
    }
}
