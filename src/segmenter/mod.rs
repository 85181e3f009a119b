//! Sentence and paragraph boundary detection.
//!
//! One [`SentenceSegmenter`] is shared by every strategy that needs sentences,
//! so the sentence, paragraph and semantic strategies always agree on where
//! sentences start and end.

mod paragraph;

#[cfg(test)]
mod tests;

use crate::span::Span;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;
use unicode_segmentation::UnicodeSegmentation;

static SENTENCE_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]+").expect("sentence terminator pattern"));

#[derive(Error, Debug)]
pub enum SegmentError {
    #[error("Sentence splitter failed: {0}")]
    SplitterFailed(String),
}

/// External sentence boundary detector (an NLP model, a service, ...)
pub trait SentenceSplitter: Send + Sync {
    fn split(&self, text: &str) -> Result<Vec<String>, SegmentError>;
}

/// A trimmed sentence or paragraph and where it sits in the source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub span: Span,
}

impl Segment {
    fn from_span(source: &str, span: Span) -> Self {
        Self {
            text: span.slice(source).to_string(),
            span,
        }
    }
}

/// Backend names accepted in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentenceBackendKind {
    #[default]
    Unicode,
    Regex,
}

/// Sentence boundary capability, in order of preference
#[derive(Clone)]
pub enum SentenceBackend {
    External(Arc<dyn SentenceSplitter>),
    /// Unicode sentence boundaries (UAX #29)
    Unicode,
    /// Cut after every run of `.`, `!` or `?`
    Regex,
}

impl fmt::Debug for SentenceBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SentenceBackend::External(_) => f.write_str("External"),
            SentenceBackend::Unicode => f.write_str("Unicode"),
            SentenceBackend::Regex => f.write_str("Regex"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SentenceSegmenter {
    backend: SentenceBackend,
}

impl SentenceSegmenter {
    pub fn new() -> Self {
        Self {
            backend: SentenceBackend::Unicode,
        }
    }

    pub fn regex() -> Self {
        Self {
            backend: SentenceBackend::Regex,
        }
    }

    pub fn with_splitter(splitter: Arc<dyn SentenceSplitter>) -> Self {
        Self {
            backend: SentenceBackend::External(splitter),
        }
    }

    pub fn from_kind(kind: SentenceBackendKind) -> Self {
        match kind {
            SentenceBackendKind::Unicode => Self::new(),
            SentenceBackendKind::Regex => Self::regex(),
        }
    }

    pub fn backend(&self) -> &SentenceBackend {
        &self.backend
    }

    /// Split text into trimmed, non-empty sentences with their spans
    pub fn split(&self, text: &str) -> Vec<Segment> {
        match &self.backend {
            SentenceBackend::External(splitter) => match splitter.split(text) {
                Ok(sentences) => locate(text, sentences),
                Err(e) => {
                    warn!(error = %e, "sentence splitter failed, using regex boundaries");
                    split_regex(text)
                }
            },
            SentenceBackend::Unicode => split_unicode(text),
            SentenceBackend::Regex => split_regex(text),
        }
    }

    pub fn sentences(&self, text: &str) -> Vec<String> {
        self.split(text).into_iter().map(|s| s.text).collect()
    }
}

impl Default for SentenceSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

fn split_unicode(text: &str) -> Vec<Segment> {
    text.split_sentence_bound_indices()
        .filter_map(|(start, s)| Span::trimmed(text, start, start + s.len()))
        .map(|span| Segment::from_span(text, span))
        .collect()
}

pub(crate) fn split_regex(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut start = 0;

    for m in SENTENCE_END.find_iter(text) {
        if let Some(span) = Span::trimmed(text, start, m.end()) {
            segments.push(Segment::from_span(text, span));
        }
        start = m.end();
    }

    if let Some(span) = Span::trimmed(text, start, text.len()) {
        segments.push(Segment::from_span(text, span));
    }

    segments
}

/// Find externally produced sentences in the source, left to right.
/// Sentences that cannot be found get an empty span at the search cursor.
fn locate(text: &str, sentences: Vec<String>) -> Vec<Segment> {
    let mut cursor = 0;

    sentences
        .into_iter()
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            let span = match text[cursor..].find(trimmed) {
                Some(offset) => Span::new(cursor + offset, cursor + offset + trimmed.len()),
                None => Span::new(cursor, cursor),
            };
            cursor = span.end;
            Some(Segment {
                text: trimmed.to_string(),
                span,
            })
        })
        .collect()
}
