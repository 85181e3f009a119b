use thiserror::Error;

#[derive(Error, Debug)]
pub enum TokenizerError {
    #[error("Vocabulary unavailable: {0}")]
    VocabularyUnavailable(String),

    #[error("Failed to encode text: {0}")]
    Encode(String),

    #[error("Failed to decode tokens: {0}")]
    Decode(String),
}
