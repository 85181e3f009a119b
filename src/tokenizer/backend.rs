use super::TokenizerError;
use std::fmt;
use std::sync::Arc;
use tiktoken_rs::CoreBPE;

/// Subword vocabulary that can turn text into token ids and back
pub trait TokenEncoder: Send + Sync {
    fn encode(&self, text: &str) -> Result<Vec<u32>, TokenizerError>;

    fn decode(&self, tokens: &[u32]) -> Result<String, TokenizerError>;

    /// Byte length of each token of `text`, in order.
    ///
    /// A token may cover only part of a multi-byte character, so the lengths
    /// need not fall on `char` boundaries. They sum to `text.len()` for an
    /// encoder that reproduces its input.
    fn byte_lengths(&self, text: &str) -> Result<Vec<usize>, TokenizerError> {
        self.encode(text)?
            .iter()
            .map(|t| self.decode(std::slice::from_ref(t)).map(|s| s.len()))
            .collect()
    }
}

/// Byte-pair encoder backed by the tiktoken vocabularies
pub struct TiktokenEncoder {
    bpe: CoreBPE,
}

impl TiktokenEncoder {
    /// Load the encoding a given OpenAI model uses (e.g. "gpt-3.5-turbo")
    pub fn for_model(model: &str) -> Result<Self, TokenizerError> {
        let bpe = tiktoken_rs::get_bpe_from_model(model).map_err(|e| {
            TokenizerError::VocabularyUnavailable(format!("no encoding for {}: {}", model, e))
        })?;
        Ok(Self { bpe })
    }

    pub fn cl100k_base() -> Result<Self, TokenizerError> {
        let bpe = tiktoken_rs::cl100k_base()
            .map_err(|e| TokenizerError::VocabularyUnavailable(format!("cl100k_base: {}", e)))?;
        Ok(Self { bpe })
    }
}

impl TokenEncoder for TiktokenEncoder {
    fn encode(&self, text: &str) -> Result<Vec<u32>, TokenizerError> {
        Ok(self
            .bpe
            .encode_ordinary(text)
            .into_iter()
            .map(|t| t as u32)
            .collect())
    }

    fn decode(&self, tokens: &[u32]) -> Result<String, TokenizerError> {
        self.bpe
            .decode(tokens.iter().map(|&t| t as _).collect())
            .map_err(|e| TokenizerError::Decode(e.to_string()))
    }

    fn byte_lengths(&self, text: &str) -> Result<Vec<usize>, TokenizerError> {
        // Ids come straight from the encoder, so every one has a byte entry
        let tokens = self.bpe.encode_ordinary(text);
        Ok(self
            .bpe
            ._decode_native_and_split(tokens)
            .map(|bytes| bytes.len())
            .collect())
    }
}

/// Which tokenization capability a [`super::Tokenizer`] resolved to
#[derive(Clone)]
pub enum TokenizerBackend {
    /// Exact counts from a subword vocabulary
    Bpe {
        name: String,
        encoder: Arc<dyn TokenEncoder>,
    },
    /// No vocabulary; counts are estimated from words
    WordEstimate,
}

impl TokenizerBackend {
    pub fn name(&self) -> &str {
        match self {
            TokenizerBackend::Bpe { name, .. } => name,
            TokenizerBackend::WordEstimate => "word-estimate",
        }
    }
}

impl fmt::Debug for TokenizerBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenizerBackend::Bpe { name, .. } => f.debug_struct("Bpe").field("name", name).finish(),
            TokenizerBackend::WordEstimate => f.write_str("WordEstimate"),
        }
    }
}
