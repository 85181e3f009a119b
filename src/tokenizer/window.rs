use super::{tokens_for_words, word_spans, words_for_tokens, Tokenizer};
use crate::span::{CharOffsets, Span};

/// A run of consecutive tokens (or words, without a vocabulary)
#[derive(Debug, Clone, PartialEq)]
pub struct TokenWindow {
    /// Exact source slice covered by the window
    pub text: String,
    /// Character offset of the window start in the source
    pub start: usize,
    /// Character offset of the window end in the source
    pub end: usize,
    /// Tokens or words inside the window
    pub units: usize,
    /// Index of the first token/word of the window in the whole stream
    pub first_unit: usize,
}

/// Result of windowing a text
#[derive(Debug, Clone)]
pub struct Windows {
    pub windows: Vec<TokenWindow>,
    /// True when windows are measured in vocabulary tokens, false for words
    pub exact: bool,
    /// Requested overlap between neighbouring windows, in the same unit as `units`
    pub overlap: usize,
}

impl Tokenizer {
    /// Cut `text` into windows of `size` tokens where neighbours share
    /// `overlap` tokens. Without a vocabulary both values are converted to
    /// words with the word/token ratio.
    ///
    /// The final window may be shorter. Iteration stops as soon as a window
    /// reaches the end of the stream. Vocabulary windows only end and start
    /// where a token boundary meets a character boundary, so a window can hold
    /// fewer than `size` tokens around multi-byte characters.
    pub fn windows(&self, text: &str, size: usize, overlap: usize) -> Windows {
        let size = size.max(1);
        let overlap = overlap.min(size - 1);

        if let Some(offsets) = self.token_offsets(text) {
            return Windows {
                windows: self.bpe_windows(text, &offsets, size, size - overlap),
                exact: true,
                overlap,
            };
        }

        let words = words_for_tokens(size).max(1);
        let overlap_words = words_for_tokens(overlap).min(words - 1);
        Windows {
            windows: word_windows(text, words, words - overlap_words),
            exact: false,
            overlap: overlap_words,
        }
    }

    fn bpe_windows(&self, text: &str, offsets: &[usize], size: usize, step: usize) -> Vec<TokenWindow> {
        let count = offsets.len() - 1;
        let chars = CharOffsets::new(text);
        let mut windows = Vec::new();
        let mut i = 0;

        while i < count {
            let mut end = char_boundary(text, offsets, i, (i + size).min(count));

            // Re-encoding a slice can merge differently at its edges
            while self.count_tokens(&text[offsets[i]..offsets[end]]) > size {
                match last_boundary(text, offsets, i, end - 1) {
                    Some(shorter) => end = shorter,
                    None => break,
                }
            }

            let span = Span::new(offsets[i], offsets[end]);
            let (start, end_char) = chars.span(span);
            windows.push(TokenWindow {
                text: span.slice(text).to_string(),
                start,
                end: end_char,
                units: end - i,
                first_unit: i,
            });

            if end >= count {
                break;
            }
            i = char_boundary(text, offsets, i, (i + step).min(end));
        }

        windows
    }
}

/// Largest token index in `from + 1..=target` that starts a character
fn last_boundary(text: &str, offsets: &[usize], from: usize, target: usize) -> Option<usize> {
    (from + 1..=target)
        .rev()
        .find(|&k| text.is_char_boundary(offsets[k]))
}

/// Move `target` back to a token index that starts a character, or forward
/// when no such index lies after `from`. The last offset is always a boundary.
fn char_boundary(text: &str, offsets: &[usize], from: usize, target: usize) -> usize {
    last_boundary(text, offsets, from, target)
        .or_else(|| (target + 1..offsets.len()).find(|&k| text.is_char_boundary(offsets[k])))
        .unwrap_or(offsets.len() - 1)
}

impl Windows {
    /// Overlap of window `index` with its predecessor, in tokens
    pub fn overlap_tokens(&self, index: usize) -> usize {
        if index == 0 {
            return 0;
        }
        let window = &self.windows[index];
        if self.exact {
            // Windows may be cut short at character boundaries
            let prev = &self.windows[index - 1];
            (prev.first_unit + prev.units).saturating_sub(window.first_unit)
        } else {
            tokens_for_words(self.overlap.min(window.units))
        }
    }
}

fn word_windows(text: &str, size: usize, step: usize) -> Vec<TokenWindow> {
    let spans = word_spans(text);
    let offsets = CharOffsets::new(text);
    let mut windows = Vec::new();
    let mut i = 0;

    while i < spans.len() {
        let end = (i + size).min(spans.len());
        let span = Span::new(spans[i].start, spans[end - 1].end);
        let (start, end_char) = offsets.span(span);

        windows.push(TokenWindow {
            text: span.slice(text).to_string(),
            start,
            end: end_char,
            units: end - i,
            first_unit: i,
        });

        if end >= spans.len() {
            break;
        }
        i += step;
    }

    windows
}
